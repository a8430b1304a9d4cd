pub mod api;
pub mod bot;
pub mod calc;
pub mod coingecko;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod price;
pub mod telegram;

use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state of the health/metrics server.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub metrics: PrometheusHandle,
}
