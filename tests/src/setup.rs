//! Common test setup functions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use api::{router, state::AppState};
use axum::Router;
use axum_test::TestServer;
use dataset_store::{DatasetStore, StoreConfig};
use tempfile::TempDir;
use views::{CacheConfig, Views};

use crate::fixtures;

/// Test context over a private dataset directory.
///
/// Uses the real router, view engine and file-backed store; only the data
/// directory is temporary.
pub struct TestContext {
    pub dir: TempDir,
    pub views: Arc<Views>,
    pub router: Router,
}

impl TestContext {
    /// Writes every fixture dataset and builds the router over them.
    pub fn new() -> Self {
        let ctx = Self::empty();
        for (file, contents) in fixtures::all() {
            ctx.write(file, contents);
        }
        ctx
    }

    /// Router over an empty data directory.
    pub fn empty() -> Self {
        telemetry::init_tracing(telemetry::TracingConfig::new().with_filter("warn"));

        let dir = tempfile::tempdir().expect("Failed to create data dir");
        let store = Arc::new(DatasetStore::from_config(StoreConfig::with_data_dir(
            dir.path(),
        )));
        let views = Arc::new(Views::new(store, &CacheConfig::default()));
        let router = router(AppState::new(views.clone()));

        Self { dir, views, router }
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }

    /// Replaces a backing file.
    pub fn write(&self, file: &str, contents: &str) {
        std::fs::write(self.path(file), contents).expect("Failed to write dataset");
    }

    /// Deletes a backing file.
    pub fn remove(&self, file: &str) {
        std::fs::remove_file(self.path(file)).expect("Failed to remove dataset");
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
