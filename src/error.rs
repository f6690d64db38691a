// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Record Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("no source found (tried {})", display_paths(.0))]
    NoSourceFound(Vec<PathBuf>),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row {line} in {}: {reason}", path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("missing column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// A failed outbound lookup. A legitimate "not found" is `Ok(None)`, never one of these.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup timed out: {query}")]
    Timeout { query: String },

    #[error("transport error for '{query}': {reason}")]
    Transport { query: String, reason: String },

    #[error("unexpected response for '{query}': {reason}")]
    BadResponse { query: String, reason: String },
}

impl LookupError {
    pub fn is_timeout(&self) -> bool { matches!(self, LookupError::Timeout { .. }) }
}

/// The only errors a resolution pass hands back to its caller.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not load working set: {0}")]
    Load(#[source] StoreError),

    #[error("final write to {} failed: {source}", path.display())]
    FinalWrite {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("invalid options: {0}")]
    Options(String),
}
