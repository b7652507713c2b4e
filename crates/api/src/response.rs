//! Standardized API responses.

use analytics_core::{Error, ErrorCode};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use telemetry::HealthReport;
use tracing::error;
use views::Rendered;

/// Full health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub datasets_ready: bool,
    pub datasets_resident: usize,
    pub missing_datasets: Vec<String>,
    pub components: HealthReport,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error: status plus JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    /// Malformed query string or path.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, ErrorCode::InvalidParameter.code(), msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal.code(),
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = err.error_code(), error = %err, "Request failed");
        }

        let response = ErrorResponse::new(err.to_string(), err.error_code());
        let response = match err {
            Error::SchemaMismatch { missing, .. } => response.with_details(missing),
            _ => response,
        };
        Self { status, response }
    }
}

/// Quoted entity tag for a freshness token.
pub fn entity_tag(token: &str) -> String {
    format!("\"{}\"", token)
}

fn caching_headers(response: &mut Response, token: &str, max_age_secs: u64) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&entity_tag(token)) {
        headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age_secs)) {
        headers.insert(header::CACHE_CONTROL, value);
    }
}

/// 200 response carrying a rendered view body.
pub fn view_response(rendered: Rendered, max_age_secs: u64) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        rendered.body.to_string(),
    )
        .into_response();
    caching_headers(&mut response, &rendered.etag, max_age_secs);
    response
}

/// 304 response for a client that already holds the current body.
pub fn not_modified(token: &str, max_age_secs: u64) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    caching_headers(&mut response, token, max_age_secs);
    response
}
