use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::BotError;
use crate::models::Position;

/// Valuation of a single position at a given price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionPnl {
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub initial_cost: Decimal,
    pub pnl_abs: Decimal,
    pub pnl_pct: Decimal,
}

/// A position paired with its valuation, or the reason it could not be valued.
#[derive(Debug)]
pub struct PositionValuation {
    pub position: Position,
    pub pnl: Result<PositionPnl, BotError>,
}

#[derive(Debug)]
pub struct PortfolioSummary {
    pub per_position: Vec<PositionValuation>,
    pub total_cost: Decimal,
    pub total_value: Decimal,
    pub total_pnl_abs: Decimal,
    pub total_pnl_pct: Decimal,
}

impl PortfolioSummary {
    /// Number of positions left out of the totals.
    pub fn unpriced(&self) -> usize {
        self.per_position.iter().filter(|v| v.pnl.is_err()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIf {
    pub symbol: String,
    pub usd_amount: Decimal,
    pub past_date: NaiveDate,
    pub historical_price: Decimal,
    pub current_price: Decimal,
    pub units_bought: Decimal,
    pub current_value: Decimal,
    pub multiple: Decimal,
    pub profit_abs: Decimal,
    pub profit_pct: Decimal,
}

/// All-time-high record as returned by a price source.
#[derive(Debug, Clone, PartialEq)]
pub struct AthData {
    pub name: Option<String>,
    pub price: Decimal,
    pub date: NaiveDate,
    pub market_cap: Option<Decimal>,
    pub change_24h: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthReport {
    pub symbol: String,
    pub name: String,
    pub ath_price: Decimal,
    pub ath_date: NaiveDate,
    pub current_price: Decimal,
    pub market_cap: Option<Decimal>,
    /// Percentage of the ATH still retained by the current price.
    pub degen_score: Decimal,
    /// Negative below the ATH, positive above it.
    pub change_from_ath_pct: Decimal,
    pub risk: Option<RiskScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    BlueChip,
    LargeCap,
    MidCap,
    Microcap,
    Meme,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::BlueChip => "Blue-chip 🪙 (low degen)",
            RiskTier::LargeCap => "Large-cap 💼",
            RiskTier::MidCap => "Mid-cap ⚖️",
            RiskTier::Microcap => "Microcap 🧪 (high degen)",
            RiskTier::Meme => "Meme / degen pit 🧨",
        }
    }
}

/// 1-10 rating from market cap and 24h volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskScore {
    pub score: Decimal,
    pub tier: RiskTier,
}
