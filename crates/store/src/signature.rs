//! Dataset signatures and freshness tokens.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Cheap fingerprint of a backing file: location, modification time and
/// size. Two equal signatures are assumed to describe the same content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub location: PathBuf,
    pub modified_ns: u128,
    pub size: u64,
}

impl Signature {
    pub fn new(location: impl Into<PathBuf>, modified_ns: u128, size: u64) -> Self {
        Self {
            location: location.into(),
            modified_ns,
            size,
        }
    }

    /// Builds a signature from file metadata. A platform without
    /// modification times yields 0, leaving the size to detect changes.
    pub fn from_metadata(location: &Path, meta: &Metadata) -> Self {
        let modified_ns = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self::new(location, modified_ns, meta.len())
    }

    /// Freshness token, `"{mtime_ns}-{size}"`.
    pub fn token(&self) -> String {
        format!("{}-{}", self.modified_ns, self.size)
    }
}

/// Joins the tokens of several datasets into one.
pub fn combined_token<'a>(signatures: impl IntoIterator<Item = &'a Signature>) -> String {
    signatures
        .into_iter()
        .map(Signature::token)
        .collect::<Vec<_>>()
        .join(".")
}
