use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::types::{
    parse_ath_date, CoinResponse, HistoryResponse, MarketEntry, SearchResponse, UsdQuote,
};
use crate::config::AppConfig;
use crate::errors::{BotError, Result};
use crate::models::AthData;
use crate::price::PriceSource;

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Tickers resolved without a `/search` round-trip.
fn known_id(symbol: &str) -> Option<&'static str> {
    let id = match symbol.to_ascii_lowercase().as_str() {
        "btc" => "bitcoin",
        "eth" => "ethereum",
        "sol" => "solana",
        "bnb" => "binancecoin",
        "xrp" => "ripple",
        "ada" => "cardano",
        "doge" => "dogecoin",
        "ton" => "the-open-network",
        "trx" => "tron",
        "matic" => "matic-network",
        "avax" => "avalanche-2",
        "ltc" => "litecoin",
        "uni" => "uniswap",
        "link" => "chainlink",
        "atom" => "cosmos",
        "near" => "near",
        "arb" => "arbitrum",
        "op" => "optimism",
        "sei" => "sei-network",
        "inj" => "injective-protocol",
        "usdc" => "usd-coin",
        "usdt" => "tether",
        "dai" => "dai",
        "frax" => "frax",
        "shib" => "shiba-inu",
        "pepe" => "pepe",
        "bonk" => "bonk",
        "wif" => "dogwifcoin",
        "floki" => "floki",
        _ => return None,
    };
    Some(id)
}

#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub price_ttl: Duration,
    pub market_cap_ttl: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_BASE.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
            price_ttl: Duration::from_secs(20),
            market_cap_ttl: Duration::from_secs(60),
        }
    }
}

impl From<&AppConfig> for CoinGeckoConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.coingecko_base_url.trim_end_matches('/').to_string(),
            api_key: config.coingecko_api_key.clone(),
            timeout: Duration::from_secs(config.http_timeout_secs),
            price_ttl: Duration::from_secs(config.price_cache_ttl_secs),
            market_cap_ttl: Duration::from_secs(config.mcap_cache_ttl_secs),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cached {
    value: Decimal,
    at: Instant,
}

/// CoinGecko v3 REST client. Keyed by upper-case ticker; resolves tickers to
/// coin ids once and keeps short-lived price and market-cap caches.
#[derive(Debug)]
pub struct CoinGeckoClient {
    http: Client,
    config: CoinGeckoConfig,
    ids: RwLock<HashMap<String, String>>,
    prices: RwLock<HashMap<String, Cached>>,
    market_caps: RwLock<HashMap<String, Cached>>,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| BotError::PriceSource(format!("invalid CoinGecko API key: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config,
            ids: RwLock::new(HashMap::new()),
            prices: RwLock::new(HashMap::new()),
            market_caps: RwLock::new(HashMap::new()),
        })
    }

    /// GET `{base}{path}` and decode JSON. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        metrics::counter!("price_requests_total", "endpoint" => endpoint).increment(1);

        let url = format!("{}{}", self.config.base_url, path);
        let resp = self.http.get(&url).query(query).send().await?;

        match resp.status() {
            status if status.is_success() => Ok(Some(resp.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!(endpoint, "CoinGecko rate limited");
                Err(BotError::PriceSource("rate limited by CoinGecko".into()))
            }
            status => {
                tracing::warn!(endpoint, %status, "CoinGecko returned non-2xx");
                Err(BotError::PriceSource(format!("{endpoint} returned {status}")))
            }
        }
    }

    /// Map a ticker to a CoinGecko coin id.
    pub async fn resolve_id(&self, symbol: &str) -> Result<String> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if let Some(id) = known_id(&symbol) {
            return Ok(id.to_string());
        }
        if let Some(id) = self.ids.read().await.get(&symbol) {
            return Ok(id.clone());
        }

        let query = symbol.to_ascii_lowercase();
        let search: SearchResponse = self
            .get_json("search", "/search", &[("query", query.as_str())])
            .await?
            .unwrap_or_default();
        let id = search
            .best_match(&symbol)
            .map(str::to_string)
            .ok_or_else(|| BotError::SymbolNotFound(symbol.clone()))?;

        tracing::debug!(symbol = %symbol, id = %id, "Resolved CoinGecko id");
        self.ids.write().await.insert(symbol, id.clone());
        Ok(id)
    }

    async fn cached(cache: &RwLock<HashMap<String, Cached>>, symbol: &str, ttl: Duration) -> Option<Decimal> {
        cache
            .read()
            .await
            .get(symbol)
            .filter(|c| c.at.elapsed() < ttl)
            .map(|c| c.value)
    }

    async fn fetch_coin(&self, symbol: &str) -> Result<CoinResponse> {
        let id = self.resolve_id(symbol).await?;
        self.get_json("coins", &format!("/coins/{id}"), &[("localization", "false")])
            .await?
            .ok_or_else(|| BotError::SymbolNotFound(symbol.to_string()))
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn current_price(&self, symbol: &str) -> Result<Decimal> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if let Some(price) = Self::cached(&self.prices, &symbol, self.config.price_ttl).await {
            return Ok(price);
        }

        let id = self.resolve_id(&symbol).await?;
        let quotes: HashMap<String, UsdQuote> = self
            .get_json(
                "simple_price",
                "/simple/price",
                &[("ids", id.as_str()), ("vs_currencies", "usd")],
            )
            .await?
            .unwrap_or_default();
        let price = quotes
            .get(&id)
            .and_then(|q| q.usd)
            .ok_or_else(|| BotError::PriceUnavailable(symbol.clone()))?;

        self.prices.write().await.insert(
            symbol,
            Cached {
                value: price,
                at: Instant::now(),
            },
        );
        Ok(price)
    }

    async fn history_price(&self, symbol: &str, date: NaiveDate) -> Result<Decimal> {
        let symbol = symbol.trim().to_ascii_uppercase();
        let id = self.resolve_id(&symbol).await?;
        let cg_date = date.format("%d-%m-%Y").to_string();

        let history: Option<HistoryResponse> = self
            .get_json(
                "history",
                &format!("/coins/{id}/history"),
                &[("date", cg_date.as_str()), ("localization", "false")],
            )
            .await?;

        history
            .and_then(|h| h.usd_price())
            .ok_or(BotError::NoHistoricalData { symbol, date })
    }

    async fn ath(&self, symbol: &str) -> Result<AthData> {
        let symbol = symbol.trim().to_ascii_uppercase();
        let coin = self.fetch_coin(&symbol).await?;
        let not_found = || BotError::SymbolNotFound(symbol.clone());

        let md = coin.market_data.ok_or_else(not_found)?;
        let price = md.ath.usd.ok_or_else(not_found)?;
        let date = md
            .ath_date
            .usd
            .as_deref()
            .and_then(parse_ath_date)
            .ok_or_else(not_found)?;

        // Same payload carries the live quote; warm the cache with it.
        if let Some(current) = md.current_price.usd {
            self.prices.write().await.insert(
                symbol.clone(),
                Cached {
                    value: current,
                    at: Instant::now(),
                },
            );
        }

        Ok(AthData {
            name: coin.name,
            price,
            date,
            market_cap: md.market_cap.usd,
            change_24h: md.price_change_percentage_24h,
        })
    }

    async fn market_cap(&self, symbol: &str) -> Result<Option<Decimal>> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if let Some(mcap) =
            Self::cached(&self.market_caps, &symbol, self.config.market_cap_ttl).await
        {
            return Ok(Some(mcap));
        }

        let id = self.resolve_id(&symbol).await?;
        let markets: Vec<MarketEntry> = self
            .get_json(
                "markets",
                "/coins/markets",
                &[("vs_currency", "usd"), ("ids", id.as_str())],
            )
            .await?
            .unwrap_or_default();

        let mcap = markets
            .into_iter()
            .find(|m| m.id == id)
            .and_then(|m| m.market_cap);
        if let Some(value) = mcap {
            self.market_caps.write().await.insert(
                symbol,
                Cached {
                    value,
                    at: Instant::now(),
                },
            );
        }
        Ok(mcap)
    }

    async fn token_name(&self, symbol: &str) -> Option<String> {
        match self.fetch_coin(symbol).await {
            Ok(coin) => coin.name,
            Err(e) => {
                tracing::debug!(symbol, error = %e, "Token name lookup failed");
                None
            }
        }
    }
}
