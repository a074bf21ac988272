//! Error types for equipment CSV ingestion.

use thiserror::Error;

/// Errors that reject an upload as a whole.
///
/// All variants are user-correctable: the caller fixes the file and uploads
/// it again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    // === Upload Envelope Errors ===
    /// File name does not look like a CSV file.
    #[error("invalid file type: {filename} (please upload a CSV file)")]
    InvalidFileType { filename: String },

    /// Upload exceeds the configured size limit.
    #[error("upload is too large: {size} bytes (limit {limit} bytes)")]
    UploadTooLarge { size: usize, limit: usize },

    // === CSV Parsing Errors ===
    /// Bytes are not text or carry no header row.
    #[error("unreadable file: {reason}")]
    UnreadableFile { reason: String },

    /// Header lacks one or more required columns.
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// No data row survived validation.
    #[error("CSV file is empty or has no valid rows ({rejected} row(s) rejected)")]
    EmptyOrInvalidFile { rejected: usize },
}

impl IngestError {
    pub(crate) fn unreadable(reason: impl Into<String>) -> Self {
        Self::UnreadableFile {
            reason: reason.into(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_display() {
        let err = IngestError::MissingColumns {
            columns: vec!["Pressure".to_string(), "Temperature".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required columns: Pressure, Temperature"
        );
    }

    #[test]
    fn test_empty_file_display() {
        let err = IngestError::EmptyOrInvalidFile { rejected: 3 };
        assert!(err.to_string().contains("3 row(s) rejected"));
    }
}
