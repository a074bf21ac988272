//! Report error types.

use thiserror::Error;

use equip_model::DatasetId;
use equip_store::StoreError;

/// Report assembly or rendering error.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Dataset is no longer held in the caller's scope.
    #[error("dataset not found: {id}")]
    NotFound { id: DatasetId },

    /// Store failure other than a missing dataset.
    #[error(transparent)]
    Store(StoreError),

    /// Writing the rendered report failed.
    #[error("failed to write {format} report")]
    Write {
        format: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be encoded as JSON.
    #[error("failed to encode report as JSON")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn write(format: &'static str, source: std::io::Error) -> Self {
        Self::Write { format, source }
    }
}

impl From<StoreError> for ReportError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { id } => Self::NotFound { id },
            other => Self::Store(other),
        }
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
