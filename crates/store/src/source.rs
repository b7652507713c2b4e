//! Where datasets come from.
//!
//! A [`DatasetSource`] answers two questions: what is the current signature
//! of a dataset (cheap), and what does it contain (a full read). The store
//! only calls `load` after `probe` reported a signature it has not seen.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use analytics_core::{Error, Result, Table};
use telemetry::metrics;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::signature::Signature;

/// A table together with the signature of the content it was read from.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub signature: Signature,
    pub table: Table,
}

pub trait DatasetSource: Send + Sync {
    /// Current signature without reading the content.
    fn probe(&self, name: &str) -> Result<Signature>;

    /// Reads the dataset. The returned signature must describe exactly the
    /// returned table.
    fn load(&self, name: &str) -> Result<Loaded>;

    /// Every dataset this source can serve.
    fn names(&self) -> Vec<String>;
}

/// CSV files on the local filesystem.
pub struct FsSource {
    config: StoreConfig,
}

enum ReadFailure {
    /// Worth another attempt: interrupted I/O or a file replaced mid-read.
    Transient(String),
    Fatal(Error),
}

impl FsSource {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn path(&self, name: &str) -> Result<PathBuf> {
        self.config
            .path_for(name)
            .ok_or_else(|| Error::data_unavailable(name, "dataset is not configured"))
    }

    fn stat(name: &str, path: &Path) -> std::result::Result<Signature, ReadFailure> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(Signature::from_metadata(path, &meta)),
            Ok(_) => Err(ReadFailure::Fatal(Error::data_unavailable(
                name,
                format!("{} is not a file", path.display()),
            ))),
            Err(e) => Err(classify_io(name, path, e)),
        }
    }

    fn read_once(&self, name: &str, path: &Path) -> std::result::Result<Loaded, ReadFailure> {
        let before = Self::stat(name, path)?;
        let file = File::open(path).map_err(|e| classify_io(name, path, e))?;
        let table = read_csv(name, BufReader::new(file))?;
        let after = Self::stat(name, path)?;

        if before != after {
            return Err(ReadFailure::Transient(format!(
                "{} changed while being read",
                path.display()
            )));
        }

        Ok(Loaded {
            signature: after,
            table,
        })
    }
}

impl DatasetSource for FsSource {
    fn probe(&self, name: &str) -> Result<Signature> {
        let path = self.path(name)?;
        Self::stat(name, &path).map_err(|failure| match failure {
            ReadFailure::Transient(msg) => Error::data_unavailable(name, msg),
            ReadFailure::Fatal(e) => e,
        })
    }

    fn load(&self, name: &str) -> Result<Loaded> {
        let path = self.path(name)?;
        let backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                metrics().dataset_retries.inc();
                std::thread::sleep(backoff * attempt);
            }

            let start = Instant::now();
            match self.read_once(name, &path) {
                Ok(loaded) => {
                    debug!(
                        dataset = %name,
                        path = %path.display(),
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Read dataset file"
                    );
                    return Ok(loaded);
                }
                Err(ReadFailure::Fatal(e)) => return Err(e),
                Err(ReadFailure::Transient(msg)) => {
                    warn!(
                        dataset = %name,
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        error = %msg,
                        "Transient read failure, retrying"
                    );
                    last_error = msg;
                }
            }
        }

        Err(Error::data_unavailable(
            name,
            format!(
                "{} (gave up after {} attempts)",
                last_error,
                self.config.max_retries + 1
            ),
        ))
    }

    fn names(&self) -> Vec<String> {
        self.config.names().map(str::to_string).collect()
    }
}

fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::UnexpectedEof
    )
}

fn classify_io(name: &str, path: &Path, e: io::Error) -> ReadFailure {
    let msg = format!("{}: {}", path.display(), e);
    if is_transient(e.kind()) {
        ReadFailure::Transient(msg)
    } else {
        ReadFailure::Fatal(Error::data_unavailable(name, msg))
    }
}

/// Parses a headed, comma separated file into a table of text cells.
///
/// A leading byte order mark and whitespace around header names are
/// removed. Cells are kept verbatim; coercion happens in the schema guard.
fn read_csv<R: io::Read>(name: &str, reader: R) -> std::result::Result<Table, ReadFailure> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| classify_csv(name, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(ReadFailure::Fatal(Error::corrupt(name, "missing header row")));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| classify_csv(name, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Table::new(name, headers, rows).map_err(ReadFailure::Fatal)
}

fn classify_csv(name: &str, e: csv::Error) -> ReadFailure {
    let msg = e.to_string();
    match e.kind() {
        csv::ErrorKind::Io(io) if is_transient(io.kind()) => ReadFailure::Transient(msg),
        csv::ErrorKind::Io(_) => ReadFailure::Fatal(Error::data_unavailable(name, msg)),
        _ => ReadFailure::Fatal(Error::corrupt(name, msg)),
    }
}
