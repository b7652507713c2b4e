//! Tests for freshness tokens and conditional requests.
//!
//! A view's ETag is derived from the signatures of the datasets it reads, so
//! it must stay put while the files are untouched and move as soon as one
//! of them changes.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;
use serde_json::Value;

fn etag_of(response: &axum_test::TestResponse) -> String {
    response
        .header("etag")
        .to_str()
        .map(str::to_string)
        .unwrap_or_default()
}

/// Test repeated requests over unchanged data are byte-identical
#[tokio::test]
async fn test_unchanged_data_renders_identically() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/api/customer_segments").await;
    let second = server.get("/api/customer_segments").await;

    assert_eq!(first.text(), second.text());
    assert_eq!(etag_of(&first), etag_of(&second));
}

/// Test a matching If-None-Match is answered with 304
#[tokio::test]
async fn test_if_none_match_returns_304() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/api/countries_by_channel").await;
    first.assert_status_ok();
    let etag = etag_of(&first);

    let before = telemetry::metrics().not_modified.get();
    let second = server
        .get("/api/countries_by_channel")
        .add_header("If-None-Match", etag.as_str())
        .await;
    second.assert_status(StatusCode::NOT_MODIFIED);
    assert!(second.text().is_empty());
    assert_eq!(etag_of(&second), etag);
    assert!(telemetry::metrics().not_modified.get() > before);
}

/// Test a stale If-None-Match gets the new body and tag
#[tokio::test]
async fn test_changed_file_changes_etag() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/").await;
    let old_etag = etag_of(&first);

    ctx.write(
        "customers_clean.csv",
        "shopUserId,invoiceCountryId\n1,205\n2,205\n3,205\n",
    );

    let second = server
        .get("/")
        .add_header("If-None-Match", old_etag.as_str())
        .await;
    second.assert_status_ok();
    assert_ne!(etag_of(&second), old_etag);
    assert_eq!(second.text(), r#"{"customers_by_country":{"Sweden":3}}"#);
}

/// Test a view over two datasets carries both tokens
#[tokio::test]
async fn test_joined_views_combine_tokens() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let segments = server.get("/api/customer_segments").await;
    let customers = server.get("/").await;
    let orders = server.get("/api/orders_by_country").await;

    let expected = format!(
        "\"{}.{}\"",
        etag_of(&customers).trim_matches('"'),
        etag_of(&orders).trim_matches('"')
    );
    assert_eq!(etag_of(&segments), expected);

    // Touching either input moves the combined tag
    ctx.write("transactions_clean.csv", "orderId,shopUserId\no9,1\n");
    let after = server.get("/api/customer_segments").await;
    assert_ne!(etag_of(&after), etag_of(&segments));
}

/// Test a conditional request for a missing dataset still reports the error
#[tokio::test]
async fn test_conditional_request_for_missing_dataset() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let first = server.get("/returning").await;
    let etag = etag_of(&first);
    ctx.remove("return_buckets.csv");

    let response = server
        .get("/returning")
        .add_header("If-None-Match", etag.as_str())
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATA_001");
}

/// Test the rendered body is cached per dataset version
#[tokio::test]
async fn test_cache_hits_are_counted() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/api/channel_share").await.assert_status_ok();
    let before = telemetry::metrics().view_cache_hits.get();
    server.get("/api/channel_share").await.assert_status_ok();
    assert!(telemetry::metrics().view_cache_hits.get() > before);
}
