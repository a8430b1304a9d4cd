use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

/// `{"usd": 123.4}`. Other quote currencies are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsdQuote {
    #[serde(default)]
    pub usd: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
}

/// `/search?query=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

impl SearchResponse {
    /// Prefer an exact ticker match, otherwise CoinGecko's top-ranked hit.
    pub fn best_match(&self, symbol: &str) -> Option<&str> {
        self.coins
            .iter()
            .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
            .or_else(|| self.coins.first())
            .map(|c| c.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryMarketData {
    #[serde(default)]
    pub current_price: UsdQuote,
}

/// `/coins/{id}/history?date=DD-MM-YYYY`. `market_data` is absent for days
/// before the coin was listed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub market_data: Option<HistoryMarketData>,
}

impl HistoryResponse {
    pub fn usd_price(&self) -> Option<Decimal> {
        self.market_data.as_ref()?.current_price.usd
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AthDateQuote {
    #[serde(default)]
    pub usd: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub ath: UsdQuote,
    #[serde(default)]
    pub ath_date: AthDateQuote,
    #[serde(default)]
    pub current_price: UsdQuote,
    #[serde(default)]
    pub market_cap: UsdQuote,
    #[serde(default)]
    pub price_change_percentage_24h: Option<Decimal>,
}

/// `/coins/{id}?localization=false`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

/// One row of `/coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
}

/// ATH timestamps come as RFC 3339 (`2021-11-10T14:24:11.849Z`); keep the day.
pub fn parse_ath_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
