mod common;

use rust_decimal_macros::dec;

use whatifbot::bot::{handle_command, respond, Command, Sender};
use whatifbot::errors::BotError;

async fn reply(ctx: &whatifbot::bot::BotContext, user: i64, text: &str) -> String {
    respond(ctx, &common::sender(user), text)
        .await
        .unwrap_or_else(|| panic!("expected a reply to {text:?}"))
}

#[tokio::test]
async fn test_addpos_then_portfolio() {
    let ctx = common::setup_bot().await;

    let saved = reply(&ctx, 42, "/addpos btc 0.5 10000").await;
    assert!(saved.starts_with("Saved: 0.5 `BTC` @ $10000.0000"), "{saved}");

    let text = reply(&ctx, 42, "/portfolio").await;
    assert!(text.contains("*Portfolio Summary*"));
    assert!(text.contains("Initial: `$5,000.00`"), "{text}");
    assert!(text.contains("Current: `$7,500.00`"), "{text}");
    assert!(text.contains("PnL: `$2,500.00` (50.00%)"), "{text}");
    assert!(text.contains("1. 🟢 `BTC`"), "{text}");
}

#[tokio::test]
async fn test_portfolio_excludes_unpriced_positions_from_totals() {
    let ctx = common::setup_bot().await;

    reply(&ctx, 42, "/addpos BTC 1 10000").await;
    reply(&ctx, 42, "/addpos DOGE 100 0.1").await;

    let text = reply(&ctx, 42, "/portfolio").await;
    assert!(text.contains("Initial: `$10,000.00`"), "{text}");
    assert!(text.contains("Current: `$15,000.00`"), "{text}");
    assert!(text.contains("2. ❔ `DOGE`"), "{text}");
    assert!(text.contains("Could not fetch the current price for DOGE."), "{text}");
    assert!(text.contains("1 position(s) could not be valued"), "{text}");
}

#[tokio::test]
async fn test_portfolio_survives_totals_out_of_range() {
    let ctx = common::setup_bot().await;

    for _ in 0..2 {
        let saved = reply(&ctx, 42, "/addpos BTC 5000000000000000000000000 10000").await;
        assert!(saved.starts_with("Saved:"), "{saved}");
    }

    let text = reply(&ctx, 42, "/portfolio").await;
    assert!(text.contains("*Portfolio Summary*"), "{text}");
    assert!(text.contains("2. ❔ `BTC`"), "{text}");
    assert!(text.contains("Value is too large to compute."), "{text}");
    assert!(text.contains("1 position(s) could not be valued"), "{text}");

    // The bot keeps answering afterwards.
    assert!(reply(&ctx, 42, "/gm").await.starts_with("gm"));
}

#[tokio::test]
async fn test_empty_portfolio_and_isolation() {
    let ctx = common::setup_bot().await;

    reply(&ctx, 1, "/addpos ETH 2 300").await;

    let other = reply(&ctx, 2, "/portfolio").await;
    assert!(other.starts_with("You have no positions yet."));
}

#[tokio::test]
async fn test_remove_and_clear_replies() {
    let ctx = common::setup_bot().await;

    reply(&ctx, 7, "/addpos SOL 10 80").await;
    reply(&ctx, 7, "/addpos ETH 1 2000").await;

    assert_eq!(
        reply(&ctx, 7, "/remove doge").await,
        "No `DOGE` positions found in your portfolio."
    );
    assert!(reply(&ctx, 7, "/remove sol").await.contains("Removed all `SOL`"));
    assert!(reply(&ctx, 7, "/clear").await.contains("has been cleared"));
    assert_eq!(
        reply(&ctx, 7, "/clear").await,
        "You don't have any saved positions yet."
    );
}

#[tokio::test]
async fn test_whatifdate_reply() {
    let ctx = common::setup_bot().await;

    let text = reply(&ctx, 42, "/whatifdate eth 1000 2020-03-13").await;
    assert!(text.contains("*If you invested $1,000.00 in ETH on 2020-03-13:*"), "{text}");
    assert!(text.contains("Tokens bought: `10`"), "{text}");
    assert!(text.contains("Current value: `$4,000.00`"), "{text}");
    assert!(text.contains("Multiple: `4.00x`"), "{text}");
    assert!(text.contains("Profit/Loss: `$3,000.00` (300.00%)"), "{text}");
    assert!(text.contains("Market cap (now): `$48.0B`"), "{text}");
}

#[tokio::test]
async fn test_whatifdate_errors() {
    let ctx = common::setup_bot().await;

    assert_eq!(
        reply(&ctx, 42, "/whatifdate ETH 1000 2020-01-01").await,
        "No historical price for ETH on 2020-01-01."
    );
    assert!(reply(&ctx, 42, "/whatifdate ETH 1000 2999-01-01")
        .await
        .starts_with("Invalid date:"));
    assert_eq!(
        reply(&ctx, 42, "/whatifdate ETH 0 2020-03-13").await,
        "USD amount must be greater than zero."
    );
    assert_eq!(
        reply(&ctx, 42, "/whatifdate ETH 1000 13-03-2020").await,
        "Date must be YYYY-MM-DD."
    );
}

#[tokio::test]
async fn test_ath_reply() {
    let ctx = common::setup_bot().await;

    let text = reply(&ctx, 42, "/ath btc").await;
    assert!(text.contains("*All-Time High for Bitcoin (BTC)*"), "{text}");
    assert!(text.contains("ATH price: `$30000.0000`"), "{text}");
    assert!(text.contains("ATH date: `2021-11-10`"), "{text}");
    assert!(text.contains("`50.00%` of ATH retained"), "{text}");
    assert!(text.contains("Currently `50.00%` below ATH"), "{text}");
    assert!(text.contains("Degen risk:"), "{text}");

    assert_eq!(
        reply(&ctx, 42, "/ath nope").await,
        "Could not resolve the token symbol `NOPE`."
    );
}

#[tokio::test]
async fn test_usage_and_validation_replies() {
    let ctx = common::setup_bot().await;

    assert!(reply(&ctx, 42, "/addpos SOL 10").await.starts_with("Usage: `/addpos"));
    assert!(reply(&ctx, 42, "/whatifdate").await.starts_with("Usage: `/whatifdate"));
    assert!(reply(&ctx, 42, "/remove").await.starts_with("Usage: `/remove"));
    assert!(reply(&ctx, 42, "/ath").await.starts_with("Usage: `/ath"));
    assert_eq!(
        reply(&ctx, 42, "/addpos SOL ten 80").await,
        "Amount and buy price must be numbers."
    );
    assert_eq!(
        reply(&ctx, 42, "/addpos SOL -1 80").await,
        "Amount must be greater than zero."
    );
    assert!(reply(&ctx, 42, "/moon").await.starts_with("Unknown command."));
}

#[tokio::test]
async fn test_plain_text_is_ignored() {
    let ctx = common::setup_bot().await;
    assert!(respond(&ctx, &common::sender(42), "wen lambo").await.is_none());
    assert!(respond(&ctx, &common::sender(42), "   ").await.is_none());
}

#[tokio::test]
async fn test_missing_user_id() {
    let ctx = common::setup_bot().await;
    let anonymous = Sender {
        user_id: None,
        update_id: 3,
    };

    assert_eq!(
        respond(&ctx, &anonymous, "/portfolio").await.as_deref(),
        Some("Could not get your user ID.")
    );
    assert_eq!(
        respond(&ctx, &anonymous, "/addpos SOL 1 1").await.as_deref(),
        Some("Could not get your user ID.")
    );
    // Market commands do not need one.
    let welcome = respond(&ctx, &anonymous, "/start").await.unwrap();
    assert!(welcome.contains("Welcome"));
    assert!(respond(&ctx, &anonymous, "/gm").await.unwrap().starts_with("gm"));
}

#[tokio::test]
async fn test_handle_command_propagates_typed_errors() {
    let ctx = common::setup_bot().await;
    let today = common::date("2024-06-01");

    let cmd = Command::WhatIfDate {
        symbol: "ETH".into(),
        usd_amount: dec!(100),
        date: common::date("2024-06-02"),
    };
    let err = handle_command(&ctx, "42", &cmd, 1, today).await.unwrap_err();
    assert!(matches!(err, BotError::InvalidDate(_)));

    // A date equal to today is accepted when history exists.
    let ctx = whatifbot::bot::BotContext::new(
        common::setup_test_db().await,
        std::sync::Arc::new(
            common::test_prices().with_history("ETH", today, dec!(400)),
        ),
    );
    let cmd = Command::WhatIfDate {
        symbol: "ETH".into(),
        usd_amount: dec!(100),
        date: today,
    };
    let text = handle_command(&ctx, "42", &cmd, 1, today).await.unwrap();
    assert!(text.contains("Multiple: `1.00x`"), "{text}");

    let err = handle_command(&ctx, "42", &Command::Ath { symbol: "SOL".into() }, 1, today)
        .await
        .unwrap_err();
    assert!(matches!(err, BotError::SymbolNotFound(ref s) if s == "SOL"));
}

#[tokio::test]
async fn test_ath_reply_escapes_token_name() {
    let prices = common::test_prices().with_price("WBTC", dec!(15000)).with_ath(
        "WBTC",
        whatifbot::models::AthData {
            name: Some("Wrapped_BTC*".into()),
            price: dec!(30000),
            date: common::date("2021-11-10"),
            market_cap: None,
            change_24h: None,
        },
    );
    let ctx = whatifbot::bot::BotContext::new(
        common::setup_test_db().await,
        std::sync::Arc::new(prices),
    );

    let text = reply(&ctx, 42, "/ath wbtc").await;
    assert!(
        text.starts_with("📈 *All-Time High for Wrapped*\\_*BTC*\\** (WBTC)*"),
        "{text}"
    );
}
