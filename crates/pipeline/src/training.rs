//! Training Pipeline
//!
//! ingestion -> fit preprocessor on train -> transform test -> train and
//! evaluate -> persist preprocessor, then model, both stamped with the run id.

use crate::{PipelineConfig, PipelineError};
use artifact_store::ArtifactStore;
use census_schema::{IncomeClass, LabelledFrame, PredictionRequest, CENSUS_SCHEMA};
use chrono::{DateTime, Utc};
use data_ingestion::DataIngestion;
use feature_engine::TransformerBuilder;
use inference_engine::{ArtifactSet, PredictPipeline, MODEL_ARTIFACT, PREPROCESSOR_ARTIFACT};
use model_trainer::{ClassifierKind, Evaluation, ModelTrainer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

/// Whether a usable artifact pair exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Untrained,
    Trained,
}

/// Summary of a successful training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub model: ClassifierKind,
    pub train_rows: usize,
    pub test_rows: usize,
    pub evaluation: Evaluation,
}

/// Runs training against a store; concurrent runs are serialized
pub struct TrainingPipeline<S> {
    config: PipelineConfig,
    store: S,
    run_lock: Mutex<()>,
}

impl<S: ArtifactStore> TrainingPipeline<S> {
    pub fn new(config: PipelineConfig, store: S) -> Self {
        Self {
            config,
            store,
            run_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Both artifacts are present
    pub fn is_trained(&self) -> bool {
        self.store.exists(PREPROCESSOR_ARTIFACT) && self.store.exists(MODEL_ARTIFACT)
    }

    pub fn status(&self) -> TrainingStatus {
        if self.is_trained() {
            TrainingStatus::Trained
        } else {
            TrainingStatus::Untrained
        }
    }

    /// Execute one full training run, overwriting both artifacts on success
    pub fn run(&self) -> Result<TrainingReport, PipelineError> {
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Training run {} started", run_id);

        match self.execute(run_id) {
            Ok((model, train_rows, test_rows, evaluation)) => {
                let report = TrainingReport {
                    run_id,
                    started_at,
                    finished_at: Utc::now(),
                    model,
                    train_rows,
                    test_rows,
                    evaluation,
                };
                info!(
                    "Training run {} completed: accuracy {:.4}",
                    run_id, report.evaluation.accuracy
                );
                Ok(report)
            }
            Err(e) => {
                warn!("Training run {} failed ({}): {}", run_id, e.kind(), e);
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        run_id: Uuid,
    ) -> Result<(ClassifierKind, usize, usize, Evaluation), PipelineError> {
        self.config.validate()?;

        let ingestion = DataIngestion::new(self.config.ingestion.clone());
        let output = ingestion.ingest()?;

        let train = LabelledFrame::from_path(&CENSUS_SCHEMA, &output.train_path)?;
        let test = LabelledFrame::from_path(&CENSUS_SCHEMA, &output.test_path)?;

        info!("Data transformation started");
        let (transformer, train_x) = TransformerBuilder::new(CENSUS_SCHEMA)
            .scale_ordinal_codes(self.config.transform.scale_ordinal_codes)
            .fit_transform(&train.records)?;
        let test_x = transformer.transform(&test.records)?;

        let train_y = Array1::from(train.targets());
        let test_y = Array1::from(test.targets());
        let trainer = ModelTrainer::new(self.config.model.clone());
        let (model, evaluation) = trainer.train(&train_x, &train_y, &test_x, &test_y)?;

        ArtifactSet::save(&self.store, &run_id.to_string(), &transformer, &model)?;
        info!("Artifacts saved: {}, {}", PREPROCESSOR_ARTIFACT, MODEL_ARTIFACT);

        Ok((model.kind(), train.len(), test.len(), evaluation))
    }
}

impl<S: ArtifactStore + Clone> TrainingPipeline<S> {
    /// Prediction pipeline over the same store
    pub fn predictor(&self) -> PredictPipeline<S> {
        PredictPipeline::new(self.store.clone())
    }

    /// Classify one request with the current artifacts
    pub fn predict(&self, request: &PredictionRequest) -> Result<IncomeClass, PipelineError> {
        Ok(self.predictor().predict(request)?)
    }
}
