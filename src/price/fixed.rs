//! In-memory price source
//!
//! Serves prices from tables filled in up front. Used by the test-suite and
//! for running the bot offline.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::PriceSource;
use crate::errors::{BotError, Result};
use crate::models::AthData;

#[derive(Debug, Default, Clone)]
pub struct StaticPriceSource {
    current: HashMap<String, Decimal>,
    history: HashMap<(String, NaiveDate), Decimal>,
    ath: HashMap<String, AthData>,
    market_caps: HashMap<String, Decimal>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
        self.current.insert(key(symbol), price);
        self
    }

    pub fn with_history(mut self, symbol: &str, date: NaiveDate, price: Decimal) -> Self {
        self.history.insert((key(symbol), date), price);
        self
    }

    pub fn with_ath(mut self, symbol: &str, ath: AthData) -> Self {
        self.ath.insert(key(symbol), ath);
        self
    }

    pub fn with_market_cap(mut self, symbol: &str, market_cap: Decimal) -> Self {
        self.market_caps.insert(key(symbol), market_cap);
        self
    }

    fn knows(&self, symbol: &str) -> bool {
        self.current.contains_key(symbol)
            || self.ath.contains_key(symbol)
            || self.history.keys().any(|(s, _)| s == symbol)
    }
}

fn key(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn current_price(&self, symbol: &str) -> Result<Decimal> {
        let symbol = key(symbol);
        self.current
            .get(&symbol)
            .copied()
            .ok_or(BotError::PriceUnavailable(symbol))
    }

    async fn history_price(&self, symbol: &str, date: NaiveDate) -> Result<Decimal> {
        let symbol = key(symbol);
        if !self.knows(&symbol) {
            return Err(BotError::SymbolNotFound(symbol));
        }
        match self.history.get(&(symbol.clone(), date)) {
            Some(price) => Ok(*price),
            None => Err(BotError::NoHistoricalData { symbol, date }),
        }
    }

    async fn ath(&self, symbol: &str) -> Result<AthData> {
        let symbol = key(symbol);
        self.ath
            .get(&symbol)
            .cloned()
            .ok_or(BotError::SymbolNotFound(symbol))
    }

    async fn market_cap(&self, symbol: &str) -> Result<Option<Decimal>> {
        Ok(self.market_caps.get(&key(symbol)).copied())
    }
}
