//! View endpoints.
//!
//! Every handler resolves to one [`ViewRequest`] and goes through [`serve`]:
//! a conditional request is answered from the dataset signatures alone, any
//! other request renders the view on the blocking pool.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, MethodRouter},
};
use telemetry::metrics;
use tracing::debug;
use views::{ViewName, ViewRequest};

use crate::extractors::{IfNoneMatch, ViewParams};
use crate::response::{not_modified, view_response, ApiError};
use crate::state::AppState;

/// GET route rendering `name` with the request's query parameters.
pub fn view(name: ViewName) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              ViewParams(query): ViewParams,
              if_none_match: IfNoneMatch| async move {
            serve(state, ViewRequest::new(name).with_query(query), if_none_match).await
        },
    )
}

/// GET /api/country/:country_id/top-cities
pub async fn top_cities_handler(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
    ViewParams(query): ViewParams,
    if_none_match: IfNoneMatch,
) -> Result<Response, ApiError> {
    let request = ViewRequest::new(ViewName::TopCities)
        .with_query(query)
        .with_country_id(country_id);
    serve(state, request, if_none_match).await
}

async fn serve(
    state: AppState,
    request: ViewRequest,
    if_none_match: IfNoneMatch,
) -> Result<Response, ApiError> {
    let max_age = state.views.max_age_secs();

    if if_none_match.is_present() {
        let views = state.views.clone();
        let probe = request.clone();
        let current = tokio::task::spawn_blocking(move || views.current_token(&probe))
            .await
            .map_err(|e| ApiError::internal(format!("view task failed: {}", e)))?;

        // A failed probe falls through so the render reports the error.
        if let Ok(token) = current {
            if if_none_match.matches(&token) {
                metrics().not_modified.inc();
                debug!(view = request.view.as_str(), etag = %token, "Not modified");
                return Ok(not_modified(&token, max_age));
            }
        }
    }

    let views = state.views.clone();
    let rendered = tokio::task::spawn_blocking(move || views.render(&request))
        .await
        .map_err(|e| ApiError::internal(format!("view task failed: {}", e)))??;

    Ok(view_response(rendered, max_age))
}
