//! Prediction pipeline

use crate::{ArtifactSet, InferenceError, MODEL_ARTIFACT, PREPROCESSOR_ARTIFACT};
use artifact_store::ArtifactStore;
use census_schema::{CensusRecord, IncomeClass, PredictionRequest, Validator};
use model_trainer::Classifier;
use tracing::{debug, info};

/// Read-only classifier over the persisted artifacts.
///
/// Artifacts are loaded on every call, so a retrain is picked up by the
/// next prediction without restarting.
pub struct PredictPipeline<S> {
    store: S,
    validator: Validator,
}

impl<S: ArtifactStore> PredictPipeline<S> {
    /// Create a pipeline reading from `store`
    pub fn new(store: S) -> Self {
        info!("Creating prediction pipeline");
        Self {
            store,
            validator: Validator::default(),
        }
    }

    /// Underlying artifact store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether both artifacts are present
    pub fn is_ready(&self) -> bool {
        self.store.exists(PREPROCESSOR_ARTIFACT) && self.store.exists(MODEL_ARTIFACT)
    }

    /// Load and check the preprocessor and the model
    pub fn load_artifacts(&self) -> Result<ArtifactSet, InferenceError> {
        ArtifactSet::load(&self.store)
    }

    /// Classify a single request
    pub fn predict(&self, request: &PredictionRequest) -> Result<IncomeClass, InferenceError> {
        self.predict_record(&request.to_record())
    }

    /// Classify a single schema-ordered record
    pub fn predict_record(&self, record: &CensusRecord) -> Result<IncomeClass, InferenceError> {
        let start = std::time::Instant::now();
        let artifacts = self.load_artifacts()?;

        let errors = self.validator.validate_record(record).into_result().err();
        if let Some(errors) = errors {
            return Err(InferenceError::InvalidRecord(errors));
        }

        let features = artifacts.transformer.transform_one(record)?;
        let model = &artifacts.model;
        let output = model.predict(&features)?;
        let code = output.iter().next().copied().ok_or(InferenceError::EmptyPrediction)?;
        let class = IncomeClass::from_code(code);

        debug!(
            "Prediction {} by {} (run {}) in {}us",
            class.label(),
            model.name(),
            artifacts.run_id,
            start.elapsed().as_micros()
        );
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_store::MemoryArtifactStore;
    use census_schema::{ValidationError, CENSUS_SCHEMA};
    use feature_engine::TransformerBuilder;
    use model_trainer::ModelTrainer;
    use ndarray::Array1;

    fn request(age: f64, hours: f64, gain: f64) -> PredictionRequest {
        PredictionRequest {
            age: Some(age),
            fnlwgt: Some(200000.0),
            education_num: Some(10.0),
            capital_gain: Some(gain),
            capital_loss: Some(0.0),
            hours_per_week: Some(hours),
            workclass: Some("Private".to_string()),
            marital_status: Some("Married-civ-spouse".to_string()),
            occupation: Some("Sales".to_string()),
            relationship: Some("Husband".to_string()),
            race: Some("White".to_string()),
            sex: Some("Male".to_string()),
            native_country: Some("United-States".to_string()),
        }
    }

    fn trained_store() -> MemoryArtifactStore {
        let mut records = Vec::new();
        let mut labels = Vec::new();
        for i in 0..6 {
            let step = i as f64;
            records.push(request(20.0 + step, 25.0 + step, 0.0).to_record());
            labels.push(0.0);
            records.push(request(50.0 + step, 50.0 + step, 15000.0).to_record());
            labels.push(1.0);
        }

        let (transformer, x) = TransformerBuilder::new(CENSUS_SCHEMA)
            .fit_transform(&records)
            .unwrap();
        let y = Array1::from(labels);
        let (model, _) = ModelTrainer::default().train(&x, &y, &x, &y).unwrap();

        let store = MemoryArtifactStore::new();
        ArtifactSet::save(&store, "run-1", &transformer, &model).unwrap();
        store
    }

    #[test]
    fn test_predict_both_classes() {
        let pipeline = PredictPipeline::new(trained_store());
        assert!(pipeline.is_ready());

        let high = pipeline.predict(&request(55.0, 55.0, 15000.0)).unwrap();
        let low = pipeline.predict(&request(21.0, 26.0, 0.0)).unwrap();
        assert_eq!(high, IncomeClass::Above50K);
        assert_eq!(low, IncomeClass::AtMost50K);
    }

    #[test]
    fn test_repeated_predictions_are_stable() {
        let pipeline = PredictPipeline::new(trained_store());
        let req = request(37.0, 40.0, 2000.0);
        let first = pipeline.predict(&req).unwrap();
        for _ in 0..5 {
            assert_eq!(pipeline.predict(&req).unwrap(), first);
        }
    }

    #[test]
    fn test_missing_values_are_imputed() {
        let pipeline = PredictPipeline::new(trained_store());
        let req = PredictionRequest {
            workclass: None,
            capital_gain: None,
            ..request(56.0, 55.0, 0.0)
        };
        assert!(pipeline.predict(&req).is_ok());
    }

    #[test]
    fn test_untrained_store() {
        let pipeline = PredictPipeline::new(MemoryArtifactStore::new());
        assert!(!pipeline.is_ready());
        let err = pipeline.predict(&request(30.0, 40.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ArtifactMissing { ref name, .. } if name == PREPROCESSOR_ARTIFACT
        ));
    }

    #[test]
    fn test_corrupt_model_artifact() {
        let store = trained_store();
        store.write_bytes(MODEL_ARTIFACT, &[0xff, 0xff, 0xff]).unwrap();
        let err = PredictPipeline::new(store)
            .predict(&request(30.0, 40.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, InferenceError::CorruptArtifact { .. }));
    }

    #[test]
    fn test_unknown_category() {
        let pipeline = PredictPipeline::new(trained_store());
        let req = PredictionRequest {
            occupation: Some("Astronaut".to_string()),
            ..request(30.0, 40.0, 0.0)
        };
        match pipeline.predict(&req) {
            Err(InferenceError::InvalidRecord(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_every_unknown_category_is_reported() {
        let pipeline = PredictPipeline::new(trained_store());
        let req = PredictionRequest {
            workclass: Some("Astronaut".to_string()),
            race: Some("Martian".to_string()),
            native_country: Some("Atlantis".to_string()),
            ..request(30.0, 40.0, 0.0)
        };
        let errors = match pipeline.predict(&req) {
            Err(InferenceError::InvalidRecord(errors)) => errors,
            other => panic!("unexpected {:?}", other),
        };
        let columns: Vec<&str> = errors
            .iter()
            .map(|e| match e {
                ValidationError::UnknownCategory { column, .. } => *column,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(columns, vec!["workclass", "race", "native_country"]);
    }

    #[test]
    fn test_untrained_store_wins_over_invalid_record() {
        let pipeline = PredictPipeline::new(MemoryArtifactStore::new());
        let req = PredictionRequest {
            race: Some("Martian".to_string()),
            ..request(30.0, 40.0, 0.0)
        };
        assert!(matches!(
            pipeline.predict(&req),
            Err(InferenceError::ArtifactMissing { .. })
        ));
    }
}
