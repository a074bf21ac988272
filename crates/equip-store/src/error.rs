//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

use equip_model::DatasetId;

/// Dataset store error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Dataset is absent from the requested scope.
    ///
    /// Deliberately the same for "evicted", "deleted", "never existed" and
    /// "belongs to another scope".
    #[error("dataset not found: {id}")]
    NotFound { id: DatasetId },

    /// File I/O error in the snapshot directory.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("failed to {operation} snapshot {path}")]
    Serialization {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot was written by a newer schema.
    #[error("snapshot {path} has version {found} (maximum supported: {max_supported})")]
    UnsupportedSnapshotVersion {
        path: PathBuf,
        found: u32,
        max_supported: u32,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
