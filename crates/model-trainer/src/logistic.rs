//! Logistic Regression

use crate::classifier::{check_fit_shapes, Classifier};
use crate::TrainingError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// L2-regularized logistic regression fitted by batch gradient descent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients (empty until fitted)
    coefficients: Vec<f64>,
    /// Fitted intercept
    intercept: f64,
    /// Regularization strength (L2)
    pub alpha: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new logistic regression model
    pub fn new() -> Self {
        Self {
            coefficients: Vec::new(),
            intercept: 0.0,
            alpha: 1e-4,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
        }
    }

    /// Set regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        if self.coefficients.is_empty() {
            return Err(TrainingError::NotFitted);
        }
        if x.ncols() != self.coefficients.len() {
            return Err(TrainingError::ShapeMismatch {
                expected: format!("{} features", self.coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        let weights = Array1::from(self.coefficients.clone());
        let linear = x.dot(&weights) + self.intercept;
        Ok(Self::sigmoid(&linear))
    }

    /// Fitted coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
        check_fit_shapes(x, y)?;
        let n_samples = x.nrows() as f64;

        let mut weights: Array1<f64> = Array1::zeros(x.ncols());
        let mut bias = 0.0;
        let mut iterations = 0;

        for _ in 0..self.max_iter {
            iterations += 1;
            let predictions = Self::sigmoid(&(x.dot(&weights) + bias));

            let errors = &predictions - y;
            let dw = (x.t().dot(&errors) / n_samples) + (self.alpha * &weights);
            let db = errors.sum() / n_samples;

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        debug!("Logistic regression stopped after {} iterations", iterations);
        self.coefficients = weights.to_vec();
        self.intercept = bias;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}
