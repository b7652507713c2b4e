//! Health check and metrics endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics, MetricsSnapshot};

use crate::response::{ApiError, HealthResponse};
use crate::state::AppState;

/// Re-probes every configured dataset, updating the health registry.
async fn probe_datasets(state: &AppState) -> Result<Vec<String>, ApiError> {
    let views = state.views.clone();
    tokio::task::spawn_blocking(move || views.store().check_ready())
    .await
    .map_err(|e| ApiError::internal(format!("health probe failed: {}", e)))
}

/// GET /health - Full health check.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let missing = probe_datasets(&state).await?;
    let report = health().report();

    Ok(Json(HealthResponse {
        status: format!("{:?}", report.status).to_lowercase(),
        datasets_ready: missing.is_empty(),
        datasets_resident: state.views.store().resident(),
        missing_datasets: missing,
        components: report,
    }))
}

/// GET /health/ready - Readiness probe: every configured dataset is present.
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    match probe_datasets(&state).await {
        Ok(missing) if missing.is_empty() => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /metrics - In-process counters and latency histograms.
pub async fn metrics_handler() -> Json<MetricsSnapshot> {
    Json(metrics().snapshot())
}
