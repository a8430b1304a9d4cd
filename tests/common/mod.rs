use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use whatifbot::bot::{BotContext, Sender};
use whatifbot::models::AthData;
use whatifbot::price::StaticPriceSource;

/// Fresh in-memory database with migrations applied.
#[allow(dead_code)]
pub async fn setup_test_db() -> SqlitePool {
    whatifbot::db::init_memory_pool()
        .await
        .expect("Failed to create in-memory database")
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// Prices used across the bot tests.
#[allow(dead_code)]
pub fn test_prices() -> StaticPriceSource {
    StaticPriceSource::new()
        .with_price("BTC", Decimal::from(15_000))
        .with_price("ETH", Decimal::from(400))
        .with_history("ETH", date("2020-03-13"), Decimal::from(100))
        .with_market_cap("ETH", Decimal::from(48_000_000_000i64))
        .with_ath(
            "BTC",
            AthData {
                name: Some("Bitcoin".into()),
                price: Decimal::from(30_000),
                date: date("2021-11-10"),
                market_cap: Some(Decimal::from(300_000_000_000i64)),
                change_24h: Some(Decimal::new(-15, 1)),
            },
        )
}

#[allow(dead_code)]
pub async fn setup_bot() -> BotContext {
    let pool = setup_test_db().await;
    BotContext::new(pool, Arc::new(test_prices()))
}

#[allow(dead_code)]
pub fn sender(user_id: i64) -> Sender {
    Sender {
        user_id: Some(user_id.to_string()),
        update_id: 1,
    }
}
