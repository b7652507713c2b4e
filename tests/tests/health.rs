//! Tests for health check and metrics endpoints.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;
use serde_json::{json, Value};

/// Test /health endpoint returns proper structure
#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["datasets_ready"], true);
    assert_eq!(body["missing_datasets"], json!([]));
    assert!(body["datasets_resident"].is_u64());

    let status = body["status"].as_str().unwrap_or("");
    assert!(
        status == "healthy" || status == "degraded" || status == "unhealthy",
        "Status should be 'healthy', 'degraded', or 'unhealthy', got '{}'",
        status
    );
}

/// Test /health names the datasets whose files are missing
#[tokio::test]
async fn test_health_lists_missing_datasets() {
    let ctx = TestContext::new();
    ctx.remove("hybrid.csv");
    ctx.remove("basket_cf.csv");
    let server = ctx.server();

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["datasets_ready"], false);
    assert_eq!(body["missing_datasets"], json!(["basket_cf", "hybrid"]));
}

/// Test /health/ready follows the dataset files
#[tokio::test]
async fn test_ready_endpoint() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/health/ready").await.assert_status(StatusCode::OK);

    ctx.remove("customers_clean.csv");
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

/// Test /health/ready on an empty data directory
#[tokio::test]
async fn test_ready_endpoint_without_data() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

/// Test /health/live endpoint always returns 200 when service is running
#[tokio::test]
async fn test_live_endpoint() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    server.get("/health/live").await.assert_status_ok();
}

/// Test /metrics exposes view and dataset counters
#[tokio::test]
async fn test_metrics_endpoint() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/returning").await.assert_status_ok();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert!(body["view_requests"].as_u64().unwrap_or(0) >= 1);
    assert!(body["dataset_loads"].as_u64().unwrap_or(0) >= 1);
    assert!(body.get("view_latency_mean_ms").is_some());
}
