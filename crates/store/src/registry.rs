//! Signature-keyed registry of loaded datasets.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use analytics_core::{Result, Table};
use parking_lot::{Mutex, RwLock};
use telemetry::{health, metrics};
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::signature::Signature;
use crate::source::{DatasetSource, FsSource};

/// An immutable table and the signature it was loaded under.
#[derive(Debug)]
pub struct Snapshot {
    signature: Signature,
    table: Table,
}

impl Snapshot {
    pub fn new(signature: Signature, table: Table) -> Self {
        Self { signature, table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn token(&self) -> String {
        self.signature.token()
    }
}

/// Keeps every dataset resident until its signature changes.
///
/// Readers share published snapshots under a read lock. Loads are serialized
/// per dataset name, so a given signature is read from the source at most
/// once no matter how many callers race for it. A snapshot is published
/// whole: signature and table are swapped in together.
pub struct DatasetStore {
    source: Arc<dyn DatasetSource>,
    entries: RwLock<HashMap<String, Arc<Snapshot>>>,
    loaders: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DatasetStore {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
            loaders: Mutex::new(HashMap::new()),
        }
    }

    /// Store over CSV files described by `config`.
    pub fn from_config(config: StoreConfig) -> Self {
        Self::new(Arc::new(FsSource::new(config)))
    }

    /// Returns the current snapshot of `name`, loading it if the source
    /// signature differs from the resident one.
    pub fn get(&self, name: &str) -> Result<Arc<Snapshot>> {
        let signature = self.source.probe(name)?;
        if let Some(snapshot) = self.resident_matching(name, &signature) {
            return Ok(snapshot);
        }

        let lock = self.loader_lock(name);
        let _guard = lock.lock();

        // Another caller may have loaded it while we waited.
        let signature = self.source.probe(name)?;
        if let Some(snapshot) = self.resident_matching(name, &signature) {
            debug!(dataset = %name, "Dataset loaded by a concurrent caller");
            return Ok(snapshot);
        }

        self.reload(name)
    }

    /// Current signature of `name` without loading it.
    pub fn signature(&self, name: &str) -> Result<Signature> {
        self.source.probe(name)
    }

    /// Resident snapshot, if any, without probing the source.
    pub fn peek(&self, name: &str) -> Option<Arc<Snapshot>> {
        self.entries.read().get(name).cloned()
    }

    /// Drops the resident snapshot of `name`. Returns whether one existed.
    pub fn invalidate(&self, name: &str) -> bool {
        let mut entries = self.entries.write();
        let removed = entries.remove(name).is_some();
        metrics().datasets_resident.set(entries.len() as u64);
        if removed {
            info!(dataset = %name, "Dataset invalidated");
        }
        removed
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        metrics().datasets_resident.set(0);
        info!(count, "All datasets invalidated");
    }

    /// Number of resident datasets.
    pub fn resident(&self) -> usize {
        self.entries.read().len()
    }

    /// Names of configured datasets whose backing data cannot be found.
    pub fn missing(&self) -> Vec<String> {
        self.source
            .names()
            .into_iter()
            .filter(|name| self.source.probe(name).is_err())
            .collect()
    }

    /// Probes every configured dataset once, records the result in the
    /// `datasets` health component and returns the missing names.
    pub fn check_ready(&self) -> Vec<String> {
        let missing = self.missing();
        if missing.is_empty() {
            health().datasets.set_healthy();
        } else {
            warn!(missing = ?missing, "Datasets missing");
            health()
                .datasets
                .set_unhealthy(format!("missing datasets: {}", missing.join(", ")));
        }
        missing
    }

    fn resident_matching(&self, name: &str, signature: &Signature) -> Option<Arc<Snapshot>> {
        self.entries
            .read()
            .get(name)
            .filter(|s| s.signature == *signature)
            .cloned()
    }

    fn loader_lock(&self, name: &str) -> Arc<Mutex<()>> {
        self.loaders
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    fn reload(&self, name: &str) -> Result<Arc<Snapshot>> {
        let start = Instant::now();
        let loaded = match self.source.load(name) {
            Ok(loaded) => loaded,
            Err(e) => {
                metrics().dataset_load_failures.inc();
                error!(dataset = %name, error = %e, "Failed to load dataset");
                return Err(e);
            }
        };

        let elapsed = start.elapsed();
        metrics().dataset_loads.inc();
        metrics()
            .dataset_load_latency_ms
            .observe(elapsed.as_millis() as u64);

        let snapshot = Arc::new(Snapshot::new(loaded.signature, loaded.table));

        info!(
            dataset = %name,
            rows = snapshot.table.len(),
            signature = %snapshot.token(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Dataset loaded"
        );

        let mut entries = self.entries.write();
        entries.insert(name.to_string(), snapshot.clone());
        metrics().datasets_resident.set(entries.len() as u64);
        Ok(snapshot)
    }
}
