//! Dashboard Analytics Service
//!
//! Serves read-only analytics views over exported customer and transaction
//! datasets:
//! - Datasets are loaded lazily and reloaded when their files change
//! - Views are computed deterministically and cached per dataset version
//! - Responses carry an ETag derived from the datasets they read

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use api::{router, AppState};
use dataset_store::{DatasetStore, StoreConfig};
use telemetry::{init_tracing, TracingConfig};
use views::{CacheConfig, Views};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Emit logs as JSON lines
    #[serde(default)]
    log_json: bool,

    #[serde(default)]
    store: StoreConfig,

    #[serde(default)]
    cache: CacheConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_json: false,
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = load_config()?;

    let tracing_config = TracingConfig::from_env();
    let json = tracing_config.json || config.log_json;
    init_tracing(tracing_config.with_json(json));

    info!("Starting Dashboard Analytics v{}", env!("CARGO_PKG_VERSION"));
    info!(
        data_dir = %config.store.data_dir.display(),
        datasets = config.store.datasets.len(),
        "Loaded store config"
    );

    let store = Arc::new(DatasetStore::from_config(config.store.clone()));

    // Missing files are not fatal; the readiness probe reports them.
    let missing = store.check_ready();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Starting with missing datasets");
    }

    let views = Arc::new(Views::new(store, &config.cache));
    let app = router(AppState::new(views));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("DASHBOARD")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat names for the keys operators change most
    if let Ok(dir) = std::env::var("DASHBOARD_DATA_DIR") {
        config.store.data_dir = PathBuf::from(dir);
    }
    if let Ok(port) = std::env::var("DASHBOARD_PORT") {
        config.port = port
            .parse()
            .with_context(|| format!("Invalid DASHBOARD_PORT '{}'", port))?;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
