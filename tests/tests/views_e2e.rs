//! End-to-end tests for every named view.
//!
//! Each test drives the real router over the fixture datasets and checks the
//! payload against values worked out from the fixture rows.

use axum::http::StatusCode;
use integration_tests::setup::TestContext;
use serde_json::{json, Value};

/// Test the root route and its alias return the same rollup
#[tokio::test]
async fn test_customers_by_country() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        r#"{"customers_by_country":{"Sweden":2,"Denmark":1,"Norway":1,"Other":1}}"#
    );

    let alias = server.get("/api/countries").await;
    alias.assert_status_ok();
    assert_eq!(alias.text(), response.text());
}

/// Test top cities resolves the numeric id and drops unknown cities
#[tokio::test]
async fn test_top_cities() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/country/205/top-cities").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "country_id": "205",
        "country": "Sweden",
        "top_cities": [
            {"city": "Stockholm", "unique_customers": 40},
            {"city": "Lund", "unique_customers": 12}
        ]
    }));

    let limited = server
        .get("/api/country/205/top-cities")
        .add_query_param("limit", 1)
        .await;
    let body: Value = limited.json();
    assert_eq!(body["top_cities"].as_array().map(Vec::len), Some(1));
}

/// Test cities by revenue groups alphabetically with null AOV for zero orders
#[tokio::test]
async fn test_cities_by_revenue() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/cities_by_revenue").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        concat!(
            r#"{"top_cities_by_revenue_ksek":{"#,
            r#""Norway":[{"city":"Oslo","ksek":3,"avg_order_value_sek":1250}],"#,
            r#""Sweden":[{"city":"Stockholm","ksek":13,"avg_order_value_sek":1250},"#,
            r#"{"city":"Lund","ksek":1,"avg_order_value_sek":null}]}}"#
        )
    );

    let filtered = server
        .get("/api/cities_by_revenue")
        .add_query_param("country", "NORWAY")
        .await;
    let body: Value = filtered.json();
    assert!(body["top_cities_by_revenue_ksek"].get("Sweden").is_none());
    assert_eq!(body["top_cities_by_revenue_ksek"]["Norway"][0]["city"], "Oslo");
}

/// Test countries by revenue reports kSEK, AOV and order counts
#[tokio::test]
async fn test_countries_by_revenue() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/countries_by_revenue").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        concat!(
            r#"{"revenue_by_country_ksek":{"Denmark":250,"Sweden":1500},"#,
            r#""avg_order_value_by_country_sek":{"Denmark":null,"Sweden":1500},"#,
            r#""orders_count_by_country":{"Denmark":0,"Sweden":1000}}"#
        )
    );

    let alias = server.get("/api/countries_by_revenue").await;
    assert_eq!(alias.text(), response.text());
}

/// Test orders are derived from transaction lines
#[tokio::test]
async fn test_orders_by_country() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/orders_by_country").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["orders_by_country"]["Sweden"],
        json!({"ksek": 0, "orders": 2, "avg_order_value_sek": 225})
    );
    assert_eq!(
        body["orders_by_country"]["Denmark"],
        json!({"ksek": 1, "orders": 1, "avg_order_value_sek": 1000})
    );
    assert_eq!(body["orders_by_country"]["Norway"]["orders"], 1);
    assert_eq!(body["revenue_source"]["source"], "derived");
    assert_eq!(body["revenue_source"]["columns"], json!(["price", "quantity"]));
}

/// Test segments join customers with their distinct orders
#[tokio::test]
async fn test_customer_segments() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/customer_segments").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let segments = &body["customer_segments"];

    assert_eq!(segments["Sweden"]["total"], 1);
    assert_eq!(
        segments["Sweden"]["segments"]["Repeat"],
        json!({"count": 1, "pct": 100.0})
    );
    assert_eq!(segments["Denmark"]["segments"]["New"]["count"], 1);
    assert_eq!(segments["Other"]["total"], 0);

    let filtered = server
        .get("/api/customer_segments")
        .add_query_param("country", "denmark")
        .await;
    let body: Value = filtered.json();
    let countries: Vec<&String> = body["customer_segments"]
        .as_object()
        .map(|m| m.keys().collect())
        .unwrap_or_default();
    assert_eq!(countries, ["Denmark"]);
}

/// Test the age/gender cross-tab
#[tokio::test]
async fn test_customers_age_gender() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/customers_age_gender").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["ages_sorted"], json!([28, 34, 51]));
    assert_eq!(body["genders"], json!(["Female", "Male"]));
    assert_eq!(body["by_country"]["Sweden"]["Female"]["34"], 2);
    assert_eq!(body["by_country"]["Sweden"]["Male"]["51"], 1);
    assert!(body["by_country"]["Norway"].get("Male").is_none());
}

/// Test the monthly series is zero-filled from the start month
#[tokio::test]
async fn test_sales_month() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/sales_month").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["start_month"], "2024-06");
    assert_eq!(body["end_month"], "2024-08");
    assert_eq!(body["month_source"]["source"], "present");
    assert_eq!(
        body["sales_month_ksek"]["Sweden"],
        json!([
            {"month": "2024-06", "ksek": 2},
            {"month": "2024-07", "ksek": 0},
            {"month": "2024-08", "ksek": 3}
        ])
    );
    assert_eq!(body["sales_month_ksek"]["Norway"][1]["ksek"], 1);
    assert!(body["sales_month_ksek"].get("Denmark").is_none());
}

/// Test a start month after all data yields an empty series
#[tokio::test]
async fn test_sales_month_after_data() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/sales_month")
        .add_query_param("start_month", "2025-01")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["start_month"], "2025-01");
    assert_eq!(body["end_month"], "2025-01");
    assert_eq!(body["sales_month_ksek"], json!({}));
}

/// Test channel breakdown from the summary table
#[tokio::test]
async fn test_countries_by_channel() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/countries_by_channel").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        concat!(
            r#"{"countries_by_channel":{"#,
            r#""Norway":{"Telephone":4,"Web":0,"Email":0},"#,
            r#""Sweden":{"Telephone":0,"Web":15,"Email":0}}}"#
        )
    );
}

/// Test channel share from raw transactions
#[tokio::test]
async fn test_channel_share() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/channel_share").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["channel_share"]["Sweden"]["Web"],
        json!({"customers": 1, "pct": 100.0})
    );
    assert_eq!(
        body["channel_share"]["Sweden"]["Telephone"],
        json!({"customers": 0, "pct": 0.0})
    );
    assert_eq!(body["channel_share"]["Norway"]["Email"]["customers"], 1);
}

/// Test monthly channel counts are sorted by month
#[tokio::test]
async fn test_countries_by_channel_by_month() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/countries_by_channel_by_month").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["Sweden"]["Web"],
        json!([
            {"year_month": "2024-06", "customers_count": 3},
            {"year_month": "2024-07", "customers_count": 5}
        ])
    );
    assert_eq!(
        body["Sweden"]["Email"],
        json!([{"year_month": "2024-06", "customers_count": 0}])
    );
}

/// Test return buckets keep the fixed order and sum duplicates
#[tokio::test]
async fn test_returning() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/returning").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["data"],
        json!([
            {"bucket": "week 1", "customers": 10},
            {"bucket": "2 months", "customers": 6},
            {"bucket": "> 1 year", "customers": 2}
        ])
    );
    assert_eq!(body["meta"]["total_customers"], 18);
    assert_eq!(body["meta"]["buckets"], 3);
    assert_eq!(body["meta"]["order"].as_array().map(Vec::len), Some(16));

    let alias = server.get("/api/returning").await;
    assert_eq!(alias.text(), response.text());
}

/// Test brand rankings dedupe before the limit and carry meta
#[tokio::test]
async fn test_top_brands_by_country() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/top_brands_by_country")
        .add_query_param("country", "sweden")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["data"],
        json!([
            {"country": "Sweden", "brand": "Nordic", "count": 80, "rank": 1},
            {"country": "Sweden", "brand": "Acme", "count": 50, "rank": 2}
        ])
    );
    assert_eq!(body["meta"]["rows"], 2);
    assert_eq!(body["meta"]["country"], "sweden");
    assert_eq!(body["meta"]["limit"], Value::Null);

    let limited = server
        .get("/api/top_brands_by_country")
        .add_query_param("limit", 1)
        .await;
    let body: Value = limited.json();
    let brands: Vec<&str> = body["data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["brand"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(brands, ["Fjord", "Nordic"]);
}

/// Test category rankings filtered by season
#[tokio::test]
async fn test_top_categories_by_season() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/top_categories_by_season")
        .add_query_param("season_label", "summer 2024")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    let categories: Vec<&str> = body["data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["category"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(categories, ["Shoes", "Bags"]);
    assert_eq!(body["meta"]["season_label"], "summer 2024");
}

/// Test the product view lists seasons until one is chosen
#[tokio::test]
async fn test_top_products_by_season() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let seasons = server
        .get("/top_products_by_season")
        .add_query_param("country", "Sweden")
        .await;
    seasons.assert_status_ok();
    seasons.assert_json(&json!({
        "country": "Sweden",
        "season_labels": ["Summer 2024", "Winter 2024"]
    }));

    let ranked = server
        .get("/top_products_by_season")
        .add_query_param("country", "Sweden")
        .add_query_param("season_label", "Summer 2024")
        .await;
    ranked.assert_status_ok();
    let body: Value = ranked.json();
    assert_eq!(body["data"][0]["product"], "Runner");
    assert_eq!(body["data"][0]["product_id"], 1001);
    assert_eq!(body["data"][1]["rank"], 2);
    assert_eq!(body["meta"]["limit"], 10);
}

/// Test repurchase leaders
#[tokio::test]
async fn test_top_repurchase_by_country() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/top_repurchase_by_country")
        .add_query_param("country", "norway")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["data"],
        json!([{
            "country": "Norway",
            "product": "Boot",
            "product_id": 3001,
            "brand": "Fjord",
            "repurchasers": 4,
            "rank": 1
        }])
    );
}

/// Test the co-occurrence table paginates
#[tokio::test]
async fn test_cooccurrence_pagination() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/cooccurrence")
        .add_query_param("offset", 1)
        .add_query_param("limit", 1)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["data"],
        json!([{"group_a": "Runner", "group_b": "Parka", "count": 5}])
    );
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["offset"], 1);
    assert_eq!(body["meta"]["limit"], 1);
}

/// Test pass-through tables keep file column order and type cells
#[tokio::test]
async fn test_pass_through_tables() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let complements: Value = server.get("/complements").await.json();
    assert_eq!(
        complements["data"],
        json!([{"product": "Runner", "complement": "Socks", "lift": 2.5}])
    );

    let similar: Value = server.get("/semantic_similarity_recs").await.json();
    assert_eq!(similar["meta"]["columns"], json!(["product", "similar", "similarity"]));

    let same_brand: Value = server.get("/top_same_brand").await.json();
    assert_eq!(same_brand["data"][0]["rank"], 1);
    assert!(same_brand["meta"].get("total").is_none());
}

/// Test basket CF orders Top N columns numerically
#[tokio::test]
async fn test_basket_cf() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/basket_cf").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(
        body["meta"]["columns"],
        json!(["Product ID", "Top 1", "Top 2", "Top 10"])
    );
    assert_eq!(body["data"][0]["Top 1"], 2001);
    assert!(body["data"][0].get("extra").is_none());
}

/// Test hybrid drops score columns unless asked
#[tokio::test]
async fn test_hybrid_scores() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let plain: Value = server.get("/hybrid").await.json();
    assert_eq!(plain["meta"]["columns"], json!(["product", "recommendation"]));

    let scored: Value = server
        .get("/hybrid")
        .add_query_param("include_scores", true)
        .await
        .json();
    assert_eq!(
        scored["meta"]["columns"],
        json!(["product", "recommendation", "score", "Score (cf)"])
    );
    assert_eq!(scored["data"][0]["score"], 0.9);
}

/// Test every view response carries caching headers
#[tokio::test]
async fn test_views_carry_etag() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/returning").await;
    response.assert_status(StatusCode::OK);

    let etag = response.header("etag");
    let etag = etag.to_str().unwrap_or_default();
    let body: Value = response.json();
    assert_eq!(etag, format!("\"{}\"", body["meta"]["etag"].as_str().unwrap_or("")));
    assert_eq!(response.header("cache-control"), "max-age=60");
}
