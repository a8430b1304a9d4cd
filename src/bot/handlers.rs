use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use super::commands::{parse_command, Command, ParseError};
use super::format;
use crate::calc;
use crate::db::position_repo;
use crate::errors::{BotError, Result};
use crate::models::normalize_symbol;
use crate::price::PriceSource;

/// Everything a command needs, injected once at startup.
#[derive(Clone)]
pub struct BotContext {
    pub db: SqlitePool,
    pub prices: Arc<dyn PriceSource>,
}

impl BotContext {
    pub fn new(db: SqlitePool, prices: Arc<dyn PriceSource>) -> Self {
        Self { db, prices }
    }
}

/// Who sent the message and which update carried it.
#[derive(Debug, Clone)]
pub struct Sender {
    pub user_id: Option<String>,
    pub update_id: i64,
}

/// Execute one parsed command and render the reply.
pub async fn handle_command(
    ctx: &BotContext,
    user_id: &str,
    command: &Command,
    update_id: i64,
    today: NaiveDate,
) -> Result<String> {
    match command {
        Command::Start | Command::Help => Ok(format::welcome()),
        Command::Gm => Ok(format::gm(update_id)),

        Command::WhatIfDate {
            symbol,
            usd_amount,
            date,
        } => {
            let res = calc::what_if(ctx.prices.as_ref(), symbol, *usd_amount, *date, today).await?;
            let name = ctx
                .prices
                .token_name(&res.symbol)
                .await
                .unwrap_or_else(|| res.symbol.clone());
            // Market cap is decoration; a failed lookup must not sink the reply.
            let market_cap = match ctx.prices.market_cap(&res.symbol).await {
                Ok(mcap) => mcap,
                Err(e) => {
                    tracing::debug!(symbol = %res.symbol, error = %e, "Market cap unavailable");
                    None
                }
            };
            let risk = calc::risk_score(market_cap, None);
            Ok(format::what_if(&res, &name, market_cap, risk))
        }

        Command::AddPos {
            symbol,
            amount,
            buy_price,
        } => {
            let pos = position_repo::add_position(&ctx.db, user_id, symbol, *amount, *buy_price).await?;
            Ok(format::position_added(&pos))
        }

        Command::Portfolio => {
            let positions = position_repo::list_positions(&ctx.db, user_id).await?;
            if positions.is_empty() {
                return Ok(format::empty_portfolio());
            }
            let prices = calc::resolve_prices(ctx.prices.as_ref(), &positions).await;
            let summary = calc::portfolio_summary(&positions, |symbol| match prices.get(symbol) {
                Some(Ok(price)) => Ok(*price),
                _ => Err(BotError::PriceUnavailable(symbol.to_string())),
            });
            Ok(format::portfolio(&summary))
        }

        Command::Remove { symbol } => {
            let symbol = normalize_symbol(symbol)?;
            let removed = position_repo::remove_symbol(&ctx.db, user_id, &symbol).await?;
            Ok(format::removed(&symbol, removed))
        }

        Command::Clear => {
            let removed = position_repo::clear_positions(&ctx.db, user_id).await?;
            Ok(format::cleared(removed))
        }

        Command::Ath { symbol } => {
            let report = calc::ath_report(ctx.prices.as_ref(), symbol).await?;
            Ok(format::ath(&report))
        }
    }
}

fn needs_user(command: &Command) -> bool {
    matches!(
        command,
        Command::AddPos { .. } | Command::Portfolio | Command::Remove { .. } | Command::Clear
    )
}

/// Turn an incoming message into a reply. `None` means stay silent.
pub async fn respond(ctx: &BotContext, sender: &Sender, text: &str) -> Option<String> {
    let command = match parse_command(text) {
        Ok(command) => command,
        Err(ParseError::NotACommand) => return None,
        Err(ParseError::Unknown(name)) => {
            tracing::debug!(command = %name, "Unknown command");
            return Some("Unknown command. Send `/start` to see what I can do.".into());
        }
        Err(ParseError::WrongArgs(usage)) => return Some(usage.to_string()),
        Err(ParseError::Invalid(msg)) => return Some(msg),
    };

    let name = command.name();
    metrics::counter!("commands_total", "command" => name).increment(1);

    // Portfolio commands are keyed by the Telegram user; the others work without one.
    let user_id = match (&sender.user_id, needs_user(&command)) {
        (Some(id), _) => id.as_str(),
        (None, false) => "",
        (None, true) => return Some("Could not get your user ID.".into()),
    };

    let today = Utc::now().date_naive();
    match handle_command(ctx, user_id, &command, sender.update_id, today).await {
        Ok(reply) => {
            tracing::info!(command = name, user_id, "Command handled");
            Some(reply)
        }
        Err(e) => {
            metrics::counter!("command_errors_total", "command" => name).increment(1);
            if e.is_user_facing() {
                tracing::info!(command = name, user_id, error = %e, "Command rejected");
            } else {
                tracing::error!(command = name, user_id, error = %e, "Command failed");
            }
            Some(e.user_message())
        }
    }
}
