use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No historical data for {symbol} on {date}")]
    NoHistoricalData { symbol: String, date: NaiveDate },

    #[error("Division undefined: initial cost is zero")]
    DivisionUndefined,

    #[error("Price source error: {0}")]
    PriceSource(String),

    #[error("Telegram error: {0}")]
    Telegram(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl BotError {
    /// Text shown to the chat user. Infrastructure details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            BotError::InvalidInput(msg) => msg.clone(),
            BotError::InvalidDate(msg) => format!("Invalid date: {msg}. Use YYYY-MM-DD."),
            BotError::PriceUnavailable(symbol) => {
                format!("Could not fetch the current price for {symbol}.")
            }
            BotError::SymbolNotFound(symbol) => {
                format!("Could not resolve the token symbol `{symbol}`.")
            }
            BotError::NoHistoricalData { symbol, date } => {
                format!("No historical price for {symbol} on {date}.")
            }
            BotError::DivisionUndefined => "Cannot compute a percentage for a zero cost basis.".into(),
            BotError::PriceSource(_) => "Price API is unavailable right now, try again later.".into(),
            BotError::Telegram(_) | BotError::Database(_) | BotError::Migration(_) => {
                "Something went wrong on our side, try again later.".into()
            }
        }
    }

    /// Errors caused by the user's input or by missing market data, as opposed
    /// to infrastructure failures.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            BotError::PriceSource(_)
                | BotError::Telegram(_)
                | BotError::Database(_)
                | BotError::Migration(_)
        )
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        BotError::PriceSource(e.to_string())
    }
}
