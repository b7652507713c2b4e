//! Dataset store: named tables kept in memory until their files change.

pub mod config;
pub mod registry;
pub mod signature;
pub mod source;

pub use config::{StoreConfig, CATALOG};
pub use registry::{DatasetStore, Snapshot};
pub use signature::{combined_token, Signature};
pub use source::{DatasetSource, FsSource, Loaded};
