//! Price data capability
//!
//! Everything above this module depends only on [`PriceSource`], never on a
//! concrete API client or its raw response shapes.

mod fixed;

pub use fixed::StaticPriceSource;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::models::AthData;

/// USD price lookups for a token ticker.
///
/// Implementations are responsible for their own transport concerns
/// (timeouts, rate limits, caching). Callers never retry.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Latest USD price.
    async fn current_price(&self, symbol: &str) -> Result<Decimal>;

    /// USD price on a past calendar day.
    async fn history_price(&self, symbol: &str, date: NaiveDate) -> Result<Decimal>;

    /// All-time-high record.
    async fn ath(&self, symbol: &str) -> Result<AthData>;

    /// Current market cap, if the source knows it.
    async fn market_cap(&self, _symbol: &str) -> Result<Option<Decimal>> {
        Ok(None)
    }

    /// Human readable token name, e.g. "Solana" for SOL.
    async fn token_name(&self, _symbol: &str) -> Option<String> {
        None
    }
}
