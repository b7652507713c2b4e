//! Tests for error handling in the view pipeline.
//!
//! These tests verify the API returns the right status and error code for
//! bad parameters, unmatched filters and broken datasets.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;
use serde_json::{json, Value};

/// Test a malformed start month returns PARAM_001
#[tokio::test]
async fn test_invalid_start_month_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for bad in ["2024-13", "2024/06", "June"] {
        let response = server
            .get("/sales_month")
            .add_query_param("start_month", bad)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_001", "start_month {:?}", bad);
    }
}

/// Test out-of-range limits return PARAM_001
#[tokio::test]
async fn test_limit_bounds_return_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let cases = [
        ("/api/top_brands_by_country", "0"),
        ("/api/top_brands_by_country", "101"),
        ("/api/cities_by_revenue", "abc"),
        ("/top_repurchase_by_country", "11"),
    ];
    for (path, limit) in cases {
        let response = server.get(path).add_query_param("limit", limit).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_001", "{} limit={}", path, limit);
    }
}

/// Test parameter errors are reported even when datasets are missing
#[tokio::test]
async fn test_parameters_checked_before_datasets() {
    let ctx = TestContext::empty();
    let server = ctx.server();

    let response = server
        .get("/sales_month")
        .add_query_param("start_month", "2024-00")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.views.store().resident(), 0);
}

/// Test the product view requires a country
#[tokio::test]
async fn test_top_products_requires_country() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/top_products_by_season").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "PARAM_001");
}

/// Test country ids: non-numeric is 400, unknown or empty market is 404
#[tokio::test]
async fn test_top_cities_country_ids() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .get("/api/country/se/top-cities")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let unknown = server.get("/api/country/999/top-cities").await;
    unknown.assert_status(StatusCode::NOT_FOUND);
    let body: Value = unknown.json();
    assert_eq!(body["code"], "NOT_FOUND_001");

    // Finland is a known market without rows in the fixture
    server
        .get("/api/country/72/top-cities")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Test a filter that matches nothing is a 404, not an empty payload
#[tokio::test]
async fn test_unmatched_filter_returns_404() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/top_brands_by_country")
        .add_query_param("country", "Iceland")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .get("/top_products_by_season")
        .add_query_param("country", "Sweden")
        .add_query_param("season_label", "Spring 1999")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test a missing backing file returns DATA_001
#[tokio::test]
async fn test_missing_dataset_returns_500() {
    let ctx = TestContext::new();
    ctx.remove("return_buckets.csv");
    let server = ctx.server();

    let response = server.get("/returning").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATA_001");

    // Other views keep working
    server.get("/").await.assert_status_ok();
}

/// Test missing columns are listed sorted in the error details
#[tokio::test]
async fn test_schema_mismatch_lists_columns() {
    let ctx = TestContext::new();
    ctx.write("city_summary.csv", "country,city\nSweden,Lund\n");
    let server = ctx.server();

    let response = server.get("/api/cities_by_revenue").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "SCHEMA_001");
    assert_eq!(body["details"], json!(["total_orders", "total_revenue_sek"]));
}

/// Test an unknown return bucket label marks the dataset corrupt
#[tokio::test]
async fn test_unknown_bucket_is_corrupt() {
    let ctx = TestContext::new();
    ctx.write("return_buckets.csv", "bucket,customers\nfortnight,3\n");
    let server = ctx.server();

    let response = server.get("/returning").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATA_002");
}

/// Test a ragged CSV file is reported as corrupt
#[tokio::test]
async fn test_ragged_csv_is_corrupt() {
    let ctx = TestContext::new();
    ctx.write("top_brands.csv", "country,brand,count,rank\nSweden,Acme\n");
    let server = ctx.server();

    let response = server.get("/api/top_brands_by_country").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATA_002");
}

/// Test failures are counted
#[tokio::test]
async fn test_failures_are_counted() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let before = telemetry::metrics().view_failures.get();
    server
        .get("/sales_month")
        .add_query_param("start_month", "nope")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert!(telemetry::metrics().view_failures.get() > before);
}
