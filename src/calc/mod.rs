pub mod ath;
pub mod pnl;
pub mod risk;
pub mod what_if;

pub use ath::ath_report;
pub use pnl::{portfolio_summary, position_pnl, resolve_prices};
pub use risk::risk_score;
pub use what_if::{parse_date, what_if};

use crate::errors::BotError;

/// Result of a checked decimal operation that left the representable range.
pub(crate) fn too_large() -> BotError {
    BotError::InvalidInput("Value is too large to compute.".into())
}
