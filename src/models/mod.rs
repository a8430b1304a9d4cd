pub mod position;
pub mod report;

pub use position::Position;
pub use report::{
    AthData, AthReport, PortfolioSummary, PositionPnl, PositionValuation, RiskScore, RiskTier,
    WhatIf,
};

use crate::errors::{BotError, Result};

const MAX_SYMBOL_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Symbol normalization
// ---------------------------------------------------------------------------

/// Trim and upper-case a ticker. Rejects empty, overlong or oddly-charactered input.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(BotError::InvalidInput("Symbol must not be empty.".into()));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(BotError::InvalidInput(format!(
            "Symbol is too long (max {MAX_SYMBOL_LEN} characters)."
        )));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(BotError::InvalidInput(format!(
            "Symbol `{symbol}` contains invalid characters."
        )));
    }
    Ok(symbol.to_ascii_uppercase())
}
