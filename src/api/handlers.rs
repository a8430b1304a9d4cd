use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// Healthy when the positions table is readable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM positions")
        .fetch_one(&state.db)
        .await
    {
        Ok((positions,)) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "positions": positions })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "db": "disconnected" })),
            )
        }
    }
}

/// Prometheus scrape endpoint.
pub async fn prometheus(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics.render(),
    )
}
