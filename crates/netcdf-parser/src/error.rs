//! Error types for NetCDF parsing operations.

use std::path::Path;
use thiserror::Error;

use reanalysis_common::ReanalysisError;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// The file could not be opened as NetCDF
    #[error("failed to open NetCDF: {0}")]
    Open(String),

    /// Missing required variable or attribute
    #[error("missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("invalid data format: {0}")]
    InvalidFormat(String),
}

impl NetCdfError {
    /// Convert into the pipeline error for a file that could not be used.
    pub fn into_unreadable(self, path: &Path) -> ReanalysisError {
        ReanalysisError::unreadable(path, self.to_string())
    }
}

impl From<netcdf::Error> for NetCdfError {
    fn from(err: netcdf::Error) -> Self {
        NetCdfError::InvalidFormat(err.to_string())
    }
}
