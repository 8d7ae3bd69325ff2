//! Model training and hold-out evaluation

use crate::classifier::{Classifier, ClassifierKind, TrainedModel};
use crate::evaluation::Evaluation;
use crate::logistic::LogisticRegression;
use crate::naive_bayes::GaussianNaiveBayes;
use crate::TrainingError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Classifier choice and hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ClassifierKind,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub alpha: f64,
    pub tol: f64,
    pub var_smoothing: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::LogisticRegression,
            learning_rate: 0.1,
            max_iter: 1000,
            alpha: 1e-4,
            tol: 1e-6,
            var_smoothing: 1e-9,
        }
    }
}

/// Fits the configured classifier and scores it on the test split
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: ModelConfig,
}

impl ModelTrainer {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Unfitted classifier for the configured kind
    pub fn untrained(&self) -> TrainedModel {
        match self.config.kind {
            ClassifierKind::LogisticRegression => TrainedModel::LogisticRegression(
                LogisticRegression::new()
                    .with_learning_rate(self.config.learning_rate)
                    .with_max_iter(self.config.max_iter)
                    .with_alpha(self.config.alpha)
                    .with_tol(self.config.tol),
            ),
            ClassifierKind::GaussianNaiveBayes => TrainedModel::GaussianNaiveBayes(
                GaussianNaiveBayes::new().with_var_smoothing(self.config.var_smoothing),
            ),
        }
    }

    /// Fit on the train split and evaluate on the test split
    pub fn train(
        &self,
        train_x: &Array2<f64>,
        train_y: &Array1<f64>,
        test_x: &Array2<f64>,
        test_y: &Array1<f64>,
    ) -> Result<(TrainedModel, Evaluation), TrainingError> {
        if test_x.ncols() != train_x.ncols() {
            return Err(TrainingError::ShapeMismatch {
                expected: format!("{} test features", train_x.ncols()),
                actual: format!("{} test features", test_x.ncols()),
            });
        }
        if test_x.nrows() != test_y.len() {
            return Err(TrainingError::ShapeMismatch {
                expected: format!("{} test labels", test_x.nrows()),
                actual: format!("{} test labels", test_y.len()),
            });
        }

        let mut model = self.untrained();
        info!(
            "Training {} on {} rows x {} features",
            model.name(),
            train_x.nrows(),
            train_x.ncols()
        );
        model.fit(train_x, train_y)?;

        let predictions = model.predict(test_x)?;
        let evaluation = Evaluation::compute(test_y, &predictions)?;
        debug!("Confusion counts: {:?}", evaluation.confusion);
        info!(
            "Model evaluation on {} rows: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
            evaluation.samples,
            evaluation.accuracy,
            evaluation.precision,
            evaluation.recall,
            evaluation.f1
        );

        Ok((model, evaluation))
    }
}
