//! Census Income Pipeline
//!
//! Entry points over the stage crates: a configured training run that
//! refreshes the persisted artifacts, and single-record prediction.

mod error;
mod settings;
mod training;

pub use error::PipelineError;
pub use settings::{load_settings, PipelineConfig, TransformConfig, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use training::{TrainingPipeline, TrainingReport, TrainingStatus};

pub use census_schema::{IncomeClass, PredictionRequest};
pub use inference_engine::{PredictPipeline, MODEL_ARTIFACT, PREPROCESSOR_ARTIFACT};
