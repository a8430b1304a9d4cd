mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal_macros::dec;
use tower::ServiceExt;

use whatifbot::api::router::create_router;
use whatifbot::db::position_repo;
use whatifbot::AppState;

async fn build_test_app() -> (axum::Router, sqlx::SqlitePool) {
    let pool = common::setup_test_db().await;
    let state = AppState {
        db: pool.clone(),
        metrics: whatifbot::metrics::detached_handle(),
    };
    (create_router(state), pool)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, pool) = build_test_app().await;
    position_repo::add_position(&pool, "1", "BTC", dec!(1), dec!(100)).await.unwrap();
    position_repo::add_position(&pool, "2", "ETH", dec!(1), dec!(100)).await.unwrap();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["positions"], 2);
}

#[tokio::test]
async fn test_health_check_reports_closed_pool() {
    let (app, pool) = build_test_app().await;
    pool.close().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _pool) = build_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _pool) = build_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/positions").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
