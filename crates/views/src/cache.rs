//! Bounded cache of rendered view bodies.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of rendered bodies kept
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Time to live of a rendered body in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// `Cache-Control: max-age` sent to clients
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

fn default_max_entries() -> u64 {
    1024
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_age_secs() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

/// A rendered JSON body and the freshness token of the data behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: Arc<str>,
    pub etag: String,
}

/// Rendered bodies keyed by view, normalized parameters and token.
///
/// The token is part of the key, so a body computed from an older snapshot
/// can never be returned once the data changed.
#[derive(Clone)]
pub struct RenderCache {
    inner: Cache<String, Rendered>,
}

impl RenderCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_secs))
                .build(),
        }
    }

    pub fn key(request_key: &str, token: &str) -> String {
        format!("{}#{}", request_key, token)
    }

    pub fn get(&self, key: &str) -> Option<Rendered> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: String, rendered: Rendered) {
        self.inner.insert(key, rendered);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
