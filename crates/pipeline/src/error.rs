//! Pipeline Error Taxonomy
//!
//! Every stage error collapses into one of a few kinds that callers act on.
//! The originating error is always kept as the source.

use artifact_store::StoreError;
use census_schema::ValidationError;
use data_ingestion::IngestionError;
use feature_engine::TransformError;
use inference_engine::{InferenceError, MODEL_ARTIFACT, PREPROCESSOR_ARTIFACT};
use model_trainer::TrainingError;
use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Domain error returned by the training and prediction entry points
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source or artifact storage could not be read or written
    #[error("I/O failure: {source}")]
    Io {
        #[source]
        source: Cause,
    },

    /// Input data does not match the census schema
    #[error("Schema violation: {source}")]
    Schema {
        #[source]
        source: Cause,
    },

    /// Categorical values outside the fixed vocabulary, in column order
    #[error("Unknown category {}", describe_categories(.categories))]
    UnknownCategory {
        categories: Vec<(&'static str, String)>,
        #[source]
        source: Cause,
    },

    /// Prediction requested before any successful training run
    #[error("Artifact '{name}' not found; the model is not trained yet")]
    ArtifactMissing {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Artifact present but unreadable or inconsistent
    #[error("Artifact '{name}' is corrupt or incompatible: {source}")]
    CorruptArtifact {
        name: String,
        #[source]
        source: Cause,
    },

    /// Model fitting or evaluation failed
    #[error("Training failed: {source}")]
    Training {
        #[source]
        source: TrainingError,
    },

    /// Invalid or unreadable configuration
    #[error("Invalid configuration: {reason}")]
    Config {
        reason: String,
        #[source]
        source: Option<config::ConfigError>,
    },
}

impl PipelineError {
    /// Stable machine-readable tag
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Io { .. } => "io",
            PipelineError::Schema { .. } => "schema",
            PipelineError::UnknownCategory { .. } => "unknown_category",
            PipelineError::ArtifactMissing { .. } => "artifact_missing",
            PipelineError::CorruptArtifact { .. } => "corrupt_artifact",
            PipelineError::Training { .. } => "training",
            PipelineError::Config { .. } => "config",
        }
    }

    /// Configuration error without an underlying cause
    pub fn config(reason: impl Into<String>) -> Self {
        PipelineError::Config {
            reason: reason.into(),
            source: None,
        }
    }

    fn schema(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        PipelineError::Schema {
            source: Box::new(err),
        }
    }

    fn corrupt(name: &str, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        PipelineError::CorruptArtifact {
            name: name.to_string(),
            source: Box::new(err),
        }
    }

    fn rejected_record(errors: Vec<ValidationError>) -> Self {
        let categories: Vec<(&'static str, String)> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::UnknownCategory { column, value } => {
                    Some((*column, value.clone()))
                }
                _ => None,
            })
            .collect();
        let err = InferenceError::InvalidRecord(errors);
        if categories.is_empty() {
            PipelineError::schema(err)
        } else {
            PipelineError::UnknownCategory {
                categories,
                source: Box::new(err),
            }
        }
    }
}

fn describe_categories(categories: &[(&'static str, String)]) -> String {
    categories
        .iter()
        .map(|(column, value)| format!("{:?} for column {}", value, column))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownCategory { column, ref value } => {
                let categories = vec![(column, value.clone())];
                PipelineError::UnknownCategory {
                    categories,
                    source: Box::new(err),
                }
            }
            err if err.is_schema() => PipelineError::schema(err),
            err => PipelineError::Io {
                source: Box::new(err),
            },
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Missing { name } => PipelineError::ArtifactMissing {
                name: name.clone(),
                source: err,
            },
            StoreError::Corrupt { name, .. } => {
                let name = name.clone();
                PipelineError::corrupt(&name, err)
            }
            _ => PipelineError::Io {
                source: Box::new(err),
            },
        }
    }
}

impl From<IngestionError> for PipelineError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::Schema(inner) => inner.into(),
            IngestionError::Store(inner) => inner.into(),
            IngestionError::SourceUnreadable { .. } | IngestionError::SplitUnwritable { .. } => {
                PipelineError::Io {
                    source: Box::new(err),
                }
            }
            IngestionError::InvalidRatio(ratio) => PipelineError::Config {
                reason: format!("test_ratio {} must lie strictly between 0 and 1", ratio),
                source: None,
            },
            other => PipelineError::schema(other),
        }
    }
}

impl From<TransformError> for PipelineError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Validation(inner) => inner.into(),
            TransformError::VocabularyMismatch(_) => {
                PipelineError::corrupt(PREPROCESSOR_ARTIFACT, err)
            }
            other => PipelineError::schema(other),
        }
    }
}

impl From<TrainingError> for PipelineError {
    fn from(err: TrainingError) -> Self {
        PipelineError::Training { source: err }
    }
}

impl From<InferenceError> for PipelineError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::ArtifactMissing { name, source } => {
                PipelineError::ArtifactMissing { name, source }
            }
            InferenceError::CorruptArtifact { name, source } => {
                PipelineError::corrupt(&name, source)
            }
            InferenceError::Store(inner) => inner.into(),
            InferenceError::Transform(inner) => inner.into(),
            InferenceError::InvalidRecord(errors) => PipelineError::rejected_record(errors),
            // a model that cannot score the preprocessor's output is a stale pair
            InferenceError::Model(inner) => PipelineError::corrupt(MODEL_ARTIFACT, inner),
            other @ (InferenceError::EmptyPrediction | InferenceError::RunMismatch { .. }) => {
                PipelineError::corrupt(MODEL_ARTIFACT, other)
            }
        }
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Config {
            reason: err.to_string(),
            source: Some(err),
        }
    }
}
