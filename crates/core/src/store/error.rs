//! Data file errors.

use std::path::PathBuf;

/// Errors from loading or saving the data file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file exists but could not be read or written.
    #[error("failed to access data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid data document. It is left untouched.
    #[error("data file {} is not a valid document: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize data file: {0}")]
    Serialize(#[source] serde_json::Error),
}
