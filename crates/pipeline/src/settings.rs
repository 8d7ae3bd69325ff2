//! Pipeline configuration
//!
//! Layered from an optional TOML file and `INCOME__`-prefixed environment
//! variables, e.g. `INCOME__INGESTION__SEED=7`.

use crate::PipelineError;
use config::{Config, Environment, File};
use data_ingestion::IngestionConfig;
use model_trainer::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Config file read when present
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "INCOME";

/// Preprocessing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Standardize ordinal codes like numeric columns
    pub scale_ordinal_codes: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            scale_ordinal_codes: true,
        }
    }
}

/// Full training configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingestion: IngestionConfig,
    pub transform: TransformConfig,
    pub model: ModelConfig,
}

impl PipelineConfig {
    /// Load from `path` (optional file) and the environment
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        Self::from_settings(load_settings(path)?)
    }

    /// Deserialize and validate already-layered settings
    pub fn from_settings(settings: Config) -> Result<Self, PipelineError> {
        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!("Pipeline configuration: {:?}", config);
        Ok(config)
    }

    /// Reject values the stages cannot run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        let ratio = self.ingestion.test_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(PipelineError::config(format!(
                "ingestion.test_ratio {} must lie strictly between 0 and 1",
                ratio
            )));
        }
        if self.model.max_iter == 0 {
            return Err(PipelineError::config("model.max_iter must be positive"));
        }
        if !(self.model.learning_rate > 0.0) {
            return Err(PipelineError::config("model.learning_rate must be positive"));
        }
        Ok(())
    }
}

/// Layer the optional file at `path` under the environment
pub fn load_settings(path: &Path) -> Result<Config, PipelineError> {
    let settings = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Ok(settings)
}
