//! Unified error types for the analytics engine.
//!
//! Every variant maps to a stable error code and an HTTP status:
//! - DATA_001: backing dataset missing or unreadable
//! - DATA_002: backing dataset cannot be parsed
//! - SCHEMA_001: required columns absent
//! - NOT_FOUND_001: a valid filter matched no rows
//! - PARAM_001: malformed request parameter
//! - INTERNAL_001: anything else

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// DATA_001: dataset missing or unreadable
    DataUnavailable,
    /// DATA_002: dataset format cannot be parsed
    CorruptDataset,
    /// SCHEMA_001: required columns absent
    SchemaMismatch,
    /// NOT_FOUND_001: filter matched zero rows
    NotFound,
    /// PARAM_001: malformed filter, limit or month
    InvalidParameter,
    /// INTERNAL_001: unexpected failure
    Internal,
}

impl ErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DataUnavailable => "DATA_001",
            Self::CorruptDataset => "DATA_002",
            Self::SchemaMismatch => "SCHEMA_001",
            Self::NotFound => "NOT_FOUND_001",
            Self::InvalidParameter => "PARAM_001",
            Self::Internal => "INTERNAL_001",
        }
    }

    /// Get the HTTP status code.
    ///
    /// Data and schema problems are deployment faults, so they surface as 500
    /// rather than as client errors.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::DataUnavailable => 500,
            Self::CorruptDataset => 500,
            Self::SchemaMismatch => 500,
            Self::NotFound => 404,
            Self::InvalidParameter => 400,
            Self::Internal => 500,
        }
    }
}

/// Unified error type for the analytics engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("dataset '{dataset}' unavailable: {message}")]
    DataUnavailable { dataset: String, message: String },

    #[error("dataset '{dataset}' is corrupt: {message}")]
    CorruptDataset { dataset: String, message: String },

    /// `missing` is always sorted.
    #[error("dataset '{dataset}' is missing columns: {}", missing.join(", "))]
    SchemaMismatch {
        dataset: String,
        missing: Vec<String>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn data_unavailable(dataset: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::DataUnavailable {
            dataset: dataset.into(),
            message: msg.into(),
        }
    }

    pub fn corrupt(dataset: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::CorruptDataset {
            dataset: dataset.into(),
            message: msg.into(),
        }
    }

    /// Create a schema mismatch; the missing names are sorted and deduplicated.
    pub fn schema_mismatch<I, S>(dataset: impl Into<String>, missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut missing: Vec<String> = missing.into_iter().map(Into::into).collect();
        missing.sort();
        missing.dedup();
        Self::SchemaMismatch {
            dataset: dataset.into(),
            missing,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the coded classification of this error.
    pub fn kind(&self) -> ErrorCode {
        match self {
            Self::DataUnavailable { .. } => ErrorCode::DataUnavailable,
            Self::CorruptDataset { .. } => ErrorCode::CorruptDataset,
            Self::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::InvalidParameter(_) => ErrorCode::InvalidParameter,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        self.kind().code()
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// Whether the caller, rather than the deployment, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}
