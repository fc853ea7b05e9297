//! Error types for the table store.

use std::path::PathBuf;
use thiserror::Error;

use demog_model::{ModelError, TableState};

/// Errors that can occur while loading, persisting, or querying tables.
#[derive(Debug, Error)]
pub enum StoreError {
    // === Lookup Errors ===
    /// No table of that name has been loaded.
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// Source file missing on disk.
    #[error("source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Directory missing on disk.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Column referenced by a query or transform is not in the table.
    #[error("column '{column}' not found in table {table}")]
    ColumnNotFound { table: String, column: String },

    /// Operation requires the table to be in a different state.
    #[error("table {table} is {actual}, expected {expected}")]
    InvalidState {
        table: String,
        expected: TableState,
        actual: TableState,
    },

    // === Source Format Errors ===
    /// File type the store cannot read.
    #[error("unsupported source format: {path} ({reason})")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Header row is beyond the end of the file or blank.
    #[error("no header at row {row} in {path}")]
    MissingHeader { path: PathBuf, row: usize },

    /// Two columns share a label after normalization.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { path: PathBuf, column: String },

    /// Polars could not parse the file.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    // === Persistence Errors ===
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temp file couldn't be renamed over the target.
    #[error("failed to replace {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON.
    #[error("invalid catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === Model / DataFrame Errors ===
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for StoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::TableNotFound {
            table: "bcg".to_string(),
        };
        assert_eq!(err.to_string(), "table not found: bcg");

        let err = StoreError::InvalidState {
            table: "bcg_mapped".to_string(),
            expected: TableState::Loaded,
            actual: TableState::Mapped,
        };
        assert_eq!(err.to_string(), "table bcg_mapped is mapped, expected loaded");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let store_err: StoreError = polars_err.into();
        assert!(matches!(store_err, StoreError::DataFrame { .. }));
    }
}
