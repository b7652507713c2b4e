//! In-process metrics.
//!
//! Counters and histograms live in a global registry and are read through
//! [`Metrics::snapshot`], which the api exposes at `/metrics`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the dashboard service.
#[derive(Debug, Default)]
pub struct Metrics {
    // View metrics
    pub view_requests: Counter,
    pub view_cache_hits: Counter,
    pub view_failures: Counter,
    pub not_modified: Counter,

    // Dataset store metrics
    pub dataset_loads: Counter,
    pub dataset_load_failures: Counter,
    pub dataset_retries: Counter,

    // Latency histograms
    pub view_latency_ms: Histogram,
    pub dataset_load_latency_ms: Histogram,

    // Gauges
    pub datasets_resident: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub view_requests: u64,
    pub view_cache_hits: u64,
    pub view_failures: u64,
    pub not_modified: u64,
    pub dataset_loads: u64,
    pub dataset_load_failures: u64,
    pub dataset_retries: u64,
    pub view_latency_mean_ms: f64,
    pub view_latency_buckets: Vec<(u64, u64)>,
    pub dataset_load_latency_mean_ms: f64,
    pub datasets_resident: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            view_requests: self.view_requests.get(),
            view_cache_hits: self.view_cache_hits.get(),
            view_failures: self.view_failures.get(),
            not_modified: self.not_modified.get(),
            dataset_loads: self.dataset_loads.get(),
            dataset_load_failures: self.dataset_load_failures.get(),
            dataset_retries: self.dataset_retries.get(),
            view_latency_mean_ms: self.view_latency_ms.mean(),
            view_latency_buckets: self.view_latency_ms.buckets(),
            dataset_load_latency_mean_ms: self.dataset_load_latency_ms.mean(),
            datasets_resident: self.datasets_resident.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
