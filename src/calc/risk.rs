use rust_decimal::Decimal;

use crate::models::{RiskScore, RiskTier};

/// Lower is safer. Buckets by market cap in USD.
fn mcap_score(market_cap: Decimal) -> Decimal {
    let billions = |n: i64| Decimal::from(n) * Decimal::from(1_000_000_000);
    let millions = |n: i64| Decimal::from(n) * Decimal::from(1_000_000);

    let score = if market_cap >= billions(10) {
        1
    } else if market_cap >= billions(1) {
        3
    } else if market_cap >= millions(200) {
        5
    } else if market_cap >= millions(50) {
        7
    } else if market_cap >= millions(5) {
        8
    } else {
        10
    };
    Decimal::from(score)
}

/// Buckets by absolute 24h change in percent. Unknown volatility scores 6.
fn volatility_score(change_24h: Option<Decimal>) -> Decimal {
    let Some(change) = change_24h else {
        return Decimal::from(6);
    };
    let change = change.abs();

    let score = if change < Decimal::from(2) {
        2
    } else if change < Decimal::from(5) {
        4
    } else if change < Decimal::from(10) {
        6
    } else if change < Decimal::from(20) {
        8
    } else {
        10
    };
    Decimal::from(score)
}

/// Blend market cap (60%) and volatility (40%) into a 1-10 rating.
/// Without a market cap there is nothing to rate.
pub fn risk_score(market_cap: Option<Decimal>, change_24h: Option<Decimal>) -> Option<RiskScore> {
    let market_cap = market_cap?;

    let raw = Decimal::new(6, 1) * mcap_score(market_cap)
        + Decimal::new(4, 1) * volatility_score(change_24h);
    let score = raw.clamp(Decimal::ONE, Decimal::TEN).round_dp(1);

    let tier = if score <= Decimal::from(2) {
        RiskTier::BlueChip
    } else if score <= Decimal::from(4) {
        RiskTier::LargeCap
    } else if score <= Decimal::from(6) {
        RiskTier::MidCap
    } else if score <= Decimal::from(8) {
        RiskTier::Microcap
    } else {
        RiskTier::Meme
    };

    Some(RiskScore { score, tier })
}
