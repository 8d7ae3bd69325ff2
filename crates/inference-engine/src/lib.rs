//! Inference Engine
//!
//! Classifies a single census record using the preprocessor and model
//! artifacts written by the last successful training run.

mod artifacts;
mod predictor;

pub use artifacts::{ArtifactSet, Stamped};
pub use predictor::PredictPipeline;

use artifact_store::StoreError;
use census_schema::ValidationError;
use feature_engine::TransformError;
use model_trainer::TrainingError;
use thiserror::Error;

/// Artifact name of the fitted preprocessor
pub const PREPROCESSOR_ARTIFACT: &str = "preprocessor";

/// Artifact name of the fitted classifier
pub const MODEL_ARTIFACT: &str = "model";

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Artifact '{name}' not found; run training first")]
    ArtifactMissing {
        name: String,
        #[source]
        source: StoreError,
    },
    #[error("Artifact '{name}' cannot be used")]
    CorruptArtifact {
        name: String,
        #[source]
        source: StoreError,
    },
    #[error("Preprocessor from run {preprocessor} does not match model from run {model}")]
    RunMismatch { preprocessor: String, model: String },
    #[error("Artifact storage failed")]
    Store(#[source] StoreError),
    #[error("Record rejected with {} invalid field(s)", .0.len())]
    InvalidRecord(Vec<ValidationError>),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Model(#[from] TrainingError),
    #[error("Model returned no prediction")]
    EmptyPrediction,
}

impl From<StoreError> for InferenceError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Missing { name } => InferenceError::ArtifactMissing {
                name: name.clone(),
                source: err,
            },
            StoreError::Corrupt { name, .. } => InferenceError::CorruptArtifact {
                name: name.clone(),
                source: err,
            },
            _ => InferenceError::Store(err),
        }
    }
}
