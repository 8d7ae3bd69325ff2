//! Model Trainer
//!
//! Binary classifiers over transformed census features, with training,
//! hold-out evaluation, and a serializable trained-model wrapper.

mod classifier;
mod evaluation;
mod logistic;
mod naive_bayes;
mod trainer;

pub use classifier::{Classifier, ClassifierKind, TrainedModel};
pub use evaluation::{ConfusionCounts, Evaluation};
pub use logistic::LogisticRegression;
pub use naive_bayes::GaussianNaiveBayes;
pub use trainer::{ModelConfig, ModelTrainer};

use thiserror::Error;

/// Errors during training or prediction
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Training labels contain a single class ({0}); both classes are required")]
    SingleClass(f64),
    #[error("Label {0} is not a binary class (0 or 1)")]
    InvalidLabel(f64),
    #[error("Model has not been fitted")]
    NotFitted,
}
