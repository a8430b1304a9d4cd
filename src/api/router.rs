use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, prometheus};
use crate::AppState;

/// Operational endpoints only; chat traffic goes through Telegram polling.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until the listener fails.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Health server listening on {addr}");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
