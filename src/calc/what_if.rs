use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::too_large;
use crate::errors::{BotError, Result};
use crate::models::{normalize_symbol, WhatIf};
use crate::price::PriceSource;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| BotError::InvalidDate(format!("`{}` is not a valid date", raw.trim())))
}

/// What `usd_amount` invested in `symbol` on `past_date` would be worth today.
pub async fn what_if(
    source: &dyn PriceSource,
    symbol: &str,
    usd_amount: Decimal,
    past_date: NaiveDate,
    today: NaiveDate,
) -> Result<WhatIf> {
    let symbol = normalize_symbol(symbol)?;
    if usd_amount <= Decimal::ZERO {
        return Err(BotError::InvalidInput("USD amount must be greater than zero.".into()));
    }
    if past_date > today {
        return Err(BotError::InvalidDate(format!("{past_date} is in the future")));
    }

    let historical_price = source.history_price(&symbol, past_date).await?;
    if historical_price <= Decimal::ZERO {
        return Err(BotError::NoHistoricalData {
            symbol,
            date: past_date,
        });
    }
    let current_price = source.current_price(&symbol).await?;

    let units_bought = usd_amount.checked_div(historical_price).ok_or_else(too_large)?;
    let current_value = units_bought.checked_mul(current_price).ok_or_else(too_large)?;
    let multiple = current_value.checked_div(usd_amount).ok_or_else(too_large)?;
    let profit_abs = current_value.checked_sub(usd_amount).ok_or_else(too_large)?;
    let profit_pct = profit_abs
        .checked_div(usd_amount)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(too_large)?;

    tracing::debug!(
        symbol = %symbol,
        %usd_amount,
        %past_date,
        %historical_price,
        %current_price,
        "What-if computed"
    );

    Ok(WhatIf {
        symbol,
        usd_amount,
        past_date,
        historical_price,
        current_price,
        units_bought,
        current_value,
        multiple,
        profit_abs,
        profit_pct,
    })
}
