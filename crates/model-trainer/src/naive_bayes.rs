//! Gaussian Naive Bayes

use crate::classifier::{check_fit_shapes, Classifier};
use crate::TrainingError;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ClassStatistics {
    label: f64,
    log_prior: f64,
    means: Vec<f64>,
    variances: Vec<f64>,
}

impl ClassStatistics {
    fn joint_log_likelihood(&self, row: ndarray::ArrayView1<f64>) -> f64 {
        let mut ll = self.log_prior;
        for ((&x, &mean), &var) in row.iter().zip(&self.means).zip(&self.variances) {
            ll -= 0.5 * (2.0 * PI * var).ln();
            ll -= (x - mean).powi(2) / (2.0 * var);
        }
        ll
    }
}

/// Gaussian Naive Bayes with per-class feature means and variances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNaiveBayes {
    classes: Vec<ClassStatistics>,
    /// Portion of the largest feature variance added to every variance
    pub var_smoothing: f64,
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            var_smoothing: 1e-9,
        }
    }

    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.var_smoothing = var_smoothing;
        self
    }
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
        check_fit_shapes(x, y)?;
        let n_samples = x.nrows() as f64;

        let max_variance = x
            .var_axis(Axis(0), 0.0)
            .iter()
            .cloned()
            .fold(0.0_f64, f64::max);
        let epsilon = (self.var_smoothing * max_variance).max(self.var_smoothing);

        let mut classes = Vec::with_capacity(2);
        for label in [0.0, 1.0] {
            let rows: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, v)| **v == label)
                .map(|(i, _)| i)
                .collect();
            let subset = x.select(Axis(0), &rows);
            let means = subset
                .mean_axis(Axis(0))
                .ok_or(TrainingError::EmptyTrainingSet)?;
            let variances = subset.var_axis(Axis(0), 0.0) + epsilon;

            classes.push(ClassStatistics {
                label,
                log_prior: (rows.len() as f64 / n_samples).ln(),
                means: means.to_vec(),
                variances: variances.to_vec(),
            });
        }

        self.classes = classes;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        let n_features = self.classes.first().ok_or(TrainingError::NotFitted)?.means.len();
        if x.ncols() != n_features {
            return Err(TrainingError::ShapeMismatch {
                expected: format!("{} features", n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = &self.classes[0];
                let mut best_ll = best.joint_log_likelihood(row);
                for class in &self.classes[1..] {
                    let ll = class.joint_log_likelihood(row);
                    if ll > best_ll {
                        best = class;
                        best_ll = ll;
                    }
                }
                best.label
            })
            .collect();
        Ok(predictions)
    }

    fn name(&self) -> &'static str {
        "gaussian_naive_bayes"
    }
}
