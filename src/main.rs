use std::sync::Arc;
use std::time::Duration;

use whatifbot::api::router;
use whatifbot::bot::{run_bot, BotContext};
use whatifbot::coingecko::{CoinGeckoClient, CoinGeckoConfig};
use whatifbot::config::AppConfig;
use whatifbot::telegram::TelegramClient;
use whatifbot::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    tracing::info!("Opening database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!(url = %config.database_url, "Database ready");

    let metrics_handle = metrics::init_metrics()?;

    // --- Health + metrics server ---
    if config.api_enabled {
        let addr = format!("{}:{}", config.host, config.port);
        let state = AppState {
            db: pool.clone(),
            metrics: metrics_handle,
        };
        tokio::spawn(async move {
            if let Err(e) = router::serve(&addr, state).await {
                tracing::error!(error = %e, "Health server stopped");
            }
        });
    } else {
        tracing::info!("Health server disabled (API_ENABLED=false)");
    }

    // --- Bot ---
    let prices = CoinGeckoClient::new(CoinGeckoConfig::from(&config))?;
    let telegram = TelegramClient::new(
        &config.telegram_api_url,
        &config.telegram_bot_token,
        Duration::from_secs(config.poll_timeout_secs),
    )?;
    let ctx = BotContext::new(pool.clone(), Arc::new(prices));

    tokio::select! {
        _ = run_bot(ctx, telegram, config.poll_timeout_secs) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    pool.close().await;
    Ok(())
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
