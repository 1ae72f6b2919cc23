//! # Document Store Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures while persisting the document.
///
/// Load never fails: an absent or corrupt file degrades to the empty
/// document and is only reported through the log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
