//! Error types for vndk-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while updating a tag dataset
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A tag row did not have exactly three fields
    #[error("malformed row at line {line} in '{path}': expected 3 fields, found {found}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        found: usize,
    },

    /// The tag file has no header row
    #[error("missing header row in '{path}'")]
    MissingHeader { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (module-info or policy file)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
