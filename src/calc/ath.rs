use rust_decimal::Decimal;

use super::risk::risk_score;
use super::too_large;
use crate::errors::{BotError, Result};
use crate::models::{normalize_symbol, AthReport};
use crate::price::PriceSource;

/// All-time-high statistics for `symbol`, with the share of the ATH the
/// current price still holds.
pub async fn ath_report(source: &dyn PriceSource, symbol: &str) -> Result<AthReport> {
    let symbol = normalize_symbol(symbol)?;
    let ath = source.ath(&symbol).await?;
    if ath.price <= Decimal::ZERO {
        return Err(BotError::DivisionUndefined);
    }
    let current_price = source.current_price(&symbol).await?;

    let degen_score = current_price
        .checked_div(ath.price)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(too_large)?;
    let name = match ath.name {
        Some(name) => name,
        None => source.token_name(&symbol).await.unwrap_or_else(|| symbol.clone()),
    };

    Ok(AthReport {
        name,
        ath_price: ath.price,
        ath_date: ath.date,
        current_price,
        market_cap: ath.market_cap,
        degen_score,
        change_from_ath_pct: degen_score - Decimal::ONE_HUNDRED,
        risk: risk_score(ath.market_cap, ath.change_24h),
        symbol,
    })
}
