use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by blob stores and the form repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored forms under '{key}' are not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode forms: {0}")]
    Encode(#[source] serde_json::Error),
}
