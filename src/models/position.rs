use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One manually entered lot. Repeated adds of the same symbol are separate rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub user_id: String,
    pub symbol: String,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Position {
    pub fn initial_cost(&self) -> Decimal {
        self.amount * self.buy_price
    }
}
