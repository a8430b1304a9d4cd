use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::errors::{BotError, Result};
use crate::models::{normalize_symbol, Position};

/// Raw `positions` row. SQLite has no decimal type, so amounts are stored as TEXT.
#[derive(Debug, sqlx::FromRow)]
struct PositionRow {
    id: i64,
    user_id: String,
    symbol: String,
    amount: String,
    buy_price: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PositionRow> for Position {
    type Error = BotError;

    fn try_from(row: PositionRow) -> Result<Self> {
        let decode = |column: &str, e: String| {
            BotError::Database(sqlx::Error::Decode(
                format!("positions.{column} (id {}): {e}", row.id).into(),
            ))
        };

        Ok(Position {
            amount: Decimal::from_str(&row.amount).map_err(|e| decode("amount", e.to_string()))?,
            buy_price: Decimal::from_str(&row.buy_price)
                .map_err(|e| decode("buy_price", e.to_string()))?,
            created_at: row.created_at,
            id: row.id,
            user_id: row.user_id,
            symbol: row.symbol,
        })
    }
}

fn check_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(BotError::InvalidInput("User id must not be empty.".into()));
    }
    Ok(())
}

/// Append a new lot. Existing lots of the same symbol are left untouched.
pub async fn add_position(
    pool: &SqlitePool,
    user_id: &str,
    symbol: &str,
    amount: Decimal,
    buy_price: Decimal,
) -> Result<Position> {
    check_user(user_id)?;
    let symbol = normalize_symbol(symbol)?;
    if amount <= Decimal::ZERO {
        return Err(BotError::InvalidInput("Amount must be greater than zero.".into()));
    }
    if buy_price <= Decimal::ZERO {
        return Err(BotError::InvalidInput("Buy price must be greater than zero.".into()));
    }

    let created_at = Utc::now();

    let row = sqlx::query_as::<_, PositionRow>(
        r#"
        INSERT INTO positions (user_id, symbol, amount, buy_price, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, symbol, amount, buy_price, created_at
        "#,
    )
    .bind(user_id)
    .bind(&symbol)
    .bind(amount.normalize().to_string())
    .bind(buy_price.normalize().to_string())
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    let position = Position::try_from(row)?;
    tracing::debug!(
        user_id,
        symbol = %position.symbol,
        amount = %position.amount,
        buy_price = %position.buy_price,
        "Position added"
    );
    Ok(position)
}

/// All positions of a user, oldest first.
pub async fn list_positions(pool: &SqlitePool, user_id: &str) -> Result<Vec<Position>> {
    check_user(user_id)?;

    let rows = sqlx::query_as::<_, PositionRow>(
        r#"
        SELECT id, user_id, symbol, amount, buy_price, created_at
        FROM positions
        WHERE user_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Position::try_from).collect()
}

/// Delete every lot of `symbol` for the user. Returns the number of rows removed.
pub async fn remove_symbol(pool: &SqlitePool, user_id: &str, symbol: &str) -> Result<u64> {
    check_user(user_id)?;
    let symbol = normalize_symbol(symbol)?;

    let result = sqlx::query("DELETE FROM positions WHERE user_id = ? AND symbol = ?")
        .bind(user_id)
        .bind(&symbol)
        .execute(pool)
        .await?;

    tracing::debug!(user_id, symbol = %symbol, removed = result.rows_affected(), "Symbol removed");
    Ok(result.rows_affected())
}

/// Delete the user's whole portfolio. Returns the number of rows removed.
pub async fn clear_positions(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    check_user(user_id)?;

    let result = sqlx::query("DELETE FROM positions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Count positions held by a user.
pub async fn count_positions(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    check_user(user_id)?;

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM positions WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
