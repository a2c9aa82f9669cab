//! Error types for the reanalysis pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ReanalysisError.
pub type ReanalysisResult<T> = Result<T, ReanalysisError>;

/// Error type returned by every pipeline stage.
#[derive(Debug, Error)]
pub enum ReanalysisError {
    // === Input Errors ===
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File \"{}\" cannot be read: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    // === Metadata Errors ===
    #[error("Missing metadata: {0}")]
    MissingMetadata(String),

    #[error("Unsupported time epoch: {0}")]
    UnsupportedEpoch(String),

    // === Rendering Errors ===
    #[error("Day index {index} out of range for {len} time steps")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Rendering failed: {0}")]
    RenderFailed(String),
}

impl ReanalysisError {
    /// Build an `UnreadableSource` error for `path`.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReanalysisError::UnreadableSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly name of the error condition.
    pub fn kind(&self) -> &'static str {
        match self {
            ReanalysisError::InvalidArgument(_) => "InvalidArgument",
            ReanalysisError::UnreadableSource { .. } => "UnreadableSource",
            ReanalysisError::MissingMetadata(_) => "MissingMetadata",
            ReanalysisError::UnsupportedEpoch(_) => "UnsupportedEpoch",
            ReanalysisError::IndexOutOfRange { .. } => "IndexOutOfRange",
            ReanalysisError::RenderFailed(_) => "RenderFailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_message_names_file() {
        let err = ReanalysisError::unreadable("foo.txt", "not a NetCDF file");
        assert_eq!(err.kind(), "UnreadableSource");
        assert!(err.to_string().contains("\"foo.txt\" cannot be read"));
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = ReanalysisError::IndexOutOfRange { index: 1000, len: 365 };
        assert_eq!(
            err.to_string(),
            "Day index 1000 out of range for 365 time steps"
        );
    }
}
