//! Transformation Error Types

use census_schema::ValidationError;
use thiserror::Error;

/// Errors while fitting or applying the transformer
#[derive(Debug, Error)]
pub enum TransformError {
    /// Input value rejected by the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Column has no observed value to learn a statistic from
    #[error("Column {0} has no observed values to fit on")]
    EmptyColumn(&'static str),

    /// Fit called on an empty frame
    #[error("Cannot fit a transformer on zero rows")]
    EmptyInput,

    /// Persisted vocabulary differs from the compiled one
    #[error("Vocabulary mismatch for {0}; retrain the preprocessor")]
    VocabularyMismatch(&'static str),
}
