use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:positions.db";
const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_api_url: String,
    pub poll_timeout_secs: u64,

    pub database_url: String,

    // Health + metrics server
    pub host: String,
    pub port: u16,
    pub api_enabled: bool,

    // Price API
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub price_cache_ttl_secs: u64,
    pub mcap_cache_ttl_secs: u64,

    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // BOT_TOKEN is the legacy name used by older deployments.
        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .or_else(|_| env::var("BOT_TOKEN"))
            .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;
        if telegram_bot_token.trim().is_empty() {
            anyhow::bail!("TELEGRAM_BOT_TOKEN must not be empty");
        }

        Ok(Self {
            telegram_bot_token,
            telegram_api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_URL.into()),
            poll_timeout_secs: parse_or("POLL_TIMEOUT_SECS", 30),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            api_enabled: parse_or("API_ENABLED", true),

            coingecko_base_url: env::var("COINGECKO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_COINGECKO_URL.into()),
            coingecko_api_key: env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 10),
            price_cache_ttl_secs: parse_or("PRICE_CACHE_TTL_SECS", 20),
            mcap_cache_ttl_secs: parse_or("MCAP_CACHE_TTL_SECS", 60),

            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
