//! API routes.

pub mod health;
pub mod reports;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use views::ViewName;

use self::reports::{top_cities_handler, view};
use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", view(ViewName::CustomersByCountry))
        .route("/api/countries", view(ViewName::CustomersByCountry))
        .route("/api/country/:country_id/top-cities", get(top_cities_handler))
        .route("/api/cities_by_revenue", view(ViewName::CitiesByRevenue))
        .route("/countries_by_revenue", view(ViewName::CountriesByRevenue))
        .route("/api/countries_by_revenue", view(ViewName::CountriesByRevenue))
        .route("/api/orders_by_country", view(ViewName::OrdersByCountry))
        .route("/api/customer_segments", view(ViewName::CustomerSegments))
        .route("/api/customers_age_gender", view(ViewName::CustomersAgeGender))
        .route("/sales_month", view(ViewName::SalesMonth))
        .route("/api/sales_month", view(ViewName::SalesMonth))
        .route("/api/countries_by_channel", view(ViewName::CountriesByChannel))
        .route("/api/channel_share", view(ViewName::ChannelShare))
        .route(
            "/countries_by_channel_by_month",
            view(ViewName::CountriesByChannelByMonth),
        )
        .route("/returning", view(ViewName::Returning))
        .route("/api/returning", view(ViewName::Returning))
        .route("/api/top_brands_by_country", view(ViewName::TopBrandsByCountry))
        .route(
            "/api/top_categories_by_season",
            view(ViewName::TopCategoriesBySeason),
        )
        .route("/top_products_by_season", view(ViewName::TopProductsBySeason))
        .route(
            "/top_repurchase_by_country",
            view(ViewName::TopRepurchaseByCountry),
        )
        .route("/cooccurrence", view(ViewName::Cooccurrence))
        .route("/complements", view(ViewName::Complements))
        .route("/basket_cf", view(ViewName::BasketCf))
        .route(
            "/semantic_similarity_recs",
            view(ViewName::SemanticSimilarityRecs),
        )
        .route("/top_same_brand", view(ViewName::TopSameBrand))
        .route("/hybrid", view(ViewName::Hybrid))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}
