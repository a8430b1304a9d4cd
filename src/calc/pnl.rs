use std::collections::HashMap;

use rust_decimal::Decimal;

use super::too_large;
use crate::errors::{BotError, Result};
use crate::models::{PortfolioSummary, Position, PositionPnl, PositionValuation};
use crate::price::PriceSource;

/// Value a single position at `current_price`.
pub fn position_pnl(position: &Position, current_price: Decimal) -> Result<PositionPnl> {
    let initial_cost = position
        .amount
        .checked_mul(position.buy_price)
        .ok_or_else(too_large)?;
    if initial_cost.is_zero() {
        return Err(BotError::DivisionUndefined);
    }

    let current_value = position
        .amount
        .checked_mul(current_price)
        .ok_or_else(too_large)?;
    let pnl_abs = current_value.checked_sub(initial_cost).ok_or_else(too_large)?;
    let pnl_pct = pnl_abs
        .checked_div(initial_cost)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(too_large)?;

    Ok(PositionPnl {
        current_price,
        current_value,
        initial_cost,
        pnl_abs,
        pnl_pct,
    })
}

/// Value every position and aggregate the ones that could be priced.
///
/// A failed lookup is recorded against its position as `PriceUnavailable`
/// and left out of the totals; it never aborts the summary. A position whose
/// value would push a total out of range is recorded as too large and
/// skipped the same way.
pub fn portfolio_summary<F>(positions: &[Position], mut price_lookup: F) -> PortfolioSummary
where
    F: FnMut(&str) -> Result<Decimal>,
{
    let mut total_cost = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;
    let mut per_position = Vec::with_capacity(positions.len());

    for position in positions {
        let pnl = match price_lookup(&position.symbol) {
            Ok(price) => position_pnl(position, price),
            Err(e) => {
                tracing::debug!(symbol = %position.symbol, error = %e, "Price lookup failed");
                Err(BotError::PriceUnavailable(position.symbol.clone()))
            }
        };

        let pnl = pnl.and_then(|p| {
            let cost = total_cost.checked_add(p.initial_cost);
            let value = total_value.checked_add(p.current_value);
            match (cost, value) {
                (Some(cost), Some(value)) => {
                    total_cost = cost;
                    total_value = value;
                    Ok(p)
                }
                _ => {
                    tracing::warn!(symbol = %position.symbol, "Portfolio total out of range");
                    Err(too_large())
                }
            }
        });

        per_position.push(PositionValuation {
            position: position.clone(),
            pnl,
        });
    }

    // Both totals are non-negative, so the difference is always representable.
    let total_pnl_abs = total_value - total_cost;
    let total_pnl_pct = total_pnl_abs
        .checked_div(total_cost)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);

    PortfolioSummary {
        per_position,
        total_cost,
        total_value,
        total_pnl_abs,
        total_pnl_pct,
    }
}

/// Fetch the current price of each distinct symbol once.
pub async fn resolve_prices(
    source: &dyn PriceSource,
    positions: &[Position],
) -> HashMap<String, Result<Decimal>> {
    let mut prices = HashMap::new();
    for position in positions {
        if prices.contains_key(&position.symbol) {
            continue;
        }
        let price = source.current_price(&position.symbol).await;
        if let Err(e) = &price {
            tracing::warn!(symbol = %position.symbol, error = %e, "Could not price position");
        }
        prices.insert(position.symbol.clone(), price);
    }
    prices
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
