//! Run-stamped preprocessor and model artifacts

use crate::{InferenceError, MODEL_ARTIFACT, PREPROCESSOR_ARTIFACT};
use artifact_store::{ArtifactStore, StoreError};
use feature_engine::Transformer;
use model_trainer::TrainedModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Artifact tagged with the training run that wrote it
#[derive(Debug, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub run_id: String,
    pub artifact: T,
}

/// Preprocessor and model written by the same training run
#[derive(Debug)]
pub struct ArtifactSet {
    pub run_id: String,
    pub transformer: Transformer,
    pub model: TrainedModel,
}

impl ArtifactSet {
    /// Persist the preprocessor, then the model, both stamped with `run_id`
    pub fn save<S: ArtifactStore>(
        store: &S,
        run_id: &str,
        transformer: &Transformer,
        model: &TrainedModel,
    ) -> Result<(), StoreError> {
        let preprocessor = Stamped {
            run_id: run_id.to_string(),
            artifact: transformer,
        };
        store.save(PREPROCESSOR_ARTIFACT, &preprocessor)?;
        let model = Stamped {
            run_id: run_id.to_string(),
            artifact: model,
        };
        store.save(MODEL_ARTIFACT, &model)?;
        debug!("Artifacts of run {} saved", run_id);
        Ok(())
    }

    /// Load both artifacts, rejecting a pair written by different runs
    pub fn load<S: ArtifactStore>(store: &S) -> Result<Self, InferenceError> {
        let preprocessor: Stamped<Transformer> = store.load(PREPROCESSOR_ARTIFACT)?;
        preprocessor.artifact.verify()?;
        let model: Stamped<TrainedModel> = store.load(MODEL_ARTIFACT)?;

        if preprocessor.run_id != model.run_id {
            return Err(InferenceError::RunMismatch {
                preprocessor: preprocessor.run_id,
                model: model.run_id,
            });
        }
        Ok(Self {
            run_id: model.run_id,
            transformer: preprocessor.artifact,
            model: model.artifact,
        })
    }
}
