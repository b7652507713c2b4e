//! Request extractors.

use analytics_core::ViewQuery;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};

use crate::response::ApiError;

/// Query parameters of a view request.
///
/// Wraps `Query<ViewQuery>` so a malformed query string is answered with
/// the same JSON error body as every other rejected parameter.
#[derive(Debug, Clone, Default)]
pub struct ViewParams(pub ViewQuery);

#[async_trait]
impl<S> FromRequestParts<S> for ViewParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ViewQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(ViewParams(query))
    }
}

/// Entity tags from the `If-None-Match` header.
#[derive(Debug, Clone, Default)]
pub struct IfNoneMatch(pub Option<String>);

impl IfNoneMatch {
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Whether any listed tag names `token`. Weak tags compare by their
    /// opaque value and `*` matches everything.
    pub fn matches(&self, token: &str) -> bool {
        let Some(raw) = self.0.as_deref() else {
            return false;
        };
        raw.split(',').map(str::trim).any(|tag| {
            if tag == "*" {
                return true;
            }
            let tag = tag.strip_prefix("W/").unwrap_or(tag);
            tag.trim_matches('"') == token
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IfNoneMatch
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::IF_NONE_MATCH)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        Ok(IfNoneMatch(value))
    }
}
