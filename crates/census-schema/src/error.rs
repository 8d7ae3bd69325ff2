//! Validation Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or validating census records
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Required column absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// Numeric cell that is neither missing nor a number
    #[error("Row {row}: {column} value {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Label cell outside the two income classes
    #[error("Row {row}: unknown income label {value:?}")]
    InvalidLabel { row: usize, value: String },

    /// Label cell left empty or marked missing
    #[error("Row {row}: income label is missing")]
    MissingLabel { row: usize },

    /// Categorical value outside the column's fixed vocabulary
    #[error("Unknown category {value:?} for column {column}")]
    UnknownCategory { column: &'static str, value: String },

    /// Malformed CSV content
    #[error("Malformed CSV: {0}")]
    Malformed(String),

    /// CSV stream failed while being read
    #[error("Failed to read CSV stream: {0}")]
    Read(#[source] std::io::Error),

    /// Source could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ValidationError {
    /// Whether the error describes the shape or content of the data
    /// rather than the environment.
    pub fn is_schema(&self) -> bool {
        !matches!(
            self,
            ValidationError::Io { .. }
                | ValidationError::Read(_)
                | ValidationError::UnknownCategory { .. }
        )
    }
}
