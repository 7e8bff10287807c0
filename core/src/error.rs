//! Error types for the persistence boundary.
//!
//! # Design
//! Store operations never fail: invalid input is a no-op. The only fallible
//! seam is `Storage`, and the store itself recovers from every variant here
//! (empty collection on load, logged and dropped on save). The variants exist
//! so adapters and tests can tell a missing file from a corrupted one.

use std::io;
use std::path::PathBuf;

/// Errors returned by `Storage` implementations and the codec.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing or renaming the entry on disk failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The collection could not be serialized.
    #[error("failed to encode todos: {0}")]
    Encode(#[source] serde_json::Error),

    /// The persisted payload is not a JSON array of todo objects.
    #[error("failed to decode todos: {0}")]
    Decode(#[source] serde_json::Error),

    /// The payload is well-formed but a record breaks an invariant.
    #[error("invalid todo at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// The backend refused the write (e.g. quota exceeded).
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// The storage configuration cannot name a durable entry.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(index: usize, reason: impl Into<String>) -> Self {
        StorageError::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }
}
