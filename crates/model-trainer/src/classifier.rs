//! Classifier abstraction and the persisted model wrapper

use crate::logistic::LogisticRegression;
use crate::naive_bayes::GaussianNaiveBayes;
use crate::TrainingError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A binary classifier over labels 0.0 / 1.0
pub trait Classifier {
    /// Learn parameters from `x` (n x d) and `y` (n)
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError>;

    /// Predict a 0.0 / 1.0 label per row
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError>;

    /// Stable identifier used in logs and reports
    fn name(&self) -> &'static str;
}

/// Which classifier the trainer builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    LogisticRegression,
    GaussianNaiveBayes,
}

/// Fitted classifier as stored in the model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainedModel {
    LogisticRegression(LogisticRegression),
    GaussianNaiveBayes(GaussianNaiveBayes),
}

impl TrainedModel {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            TrainedModel::LogisticRegression(_) => ClassifierKind::LogisticRegression,
            TrainedModel::GaussianNaiveBayes(_) => ClassifierKind::GaussianNaiveBayes,
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::GaussianNaiveBayes(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Classifier {
        match self {
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::GaussianNaiveBayes(m) => m,
        }
    }
}

impl Classifier for TrainedModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        self.inner().predict(x)
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

/// Reject empty, misaligned, non-binary, or single-class training data
pub(crate) fn check_fit_shapes(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(TrainingError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(TrainingError::ShapeMismatch {
            expected: format!("{} labels", x.nrows()),
            actual: format!("{} labels", y.len()),
        });
    }
    if let Some(&bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
        return Err(TrainingError::InvalidLabel(bad));
    }
    let first = y[0];
    if y.iter().all(|&v| v == first) {
        return Err(TrainingError::SingleClass(first));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_check_fit_shapes() {
        let x = array![[1.0], [2.0]];
        assert!(check_fit_shapes(&x, &array![0.0, 1.0]).is_ok());
        assert!(matches!(
            check_fit_shapes(&x, &array![0.0]),
            Err(TrainingError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            check_fit_shapes(&x, &array![1.0, 1.0]),
            Err(TrainingError::SingleClass(v)) if v == 1.0
        ));
        assert!(matches!(
            check_fit_shapes(&x, &array![0.0, 2.0]),
            Err(TrainingError::InvalidLabel(v)) if v == 2.0
        ));
        assert!(matches!(
            check_fit_shapes(&Array2::zeros((0, 3)), &Array1::zeros(0)),
            Err(TrainingError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_trained_model_dispatch() {
        let mut model = TrainedModel::GaussianNaiveBayes(GaussianNaiveBayes::new());
        assert_eq!(model.kind(), ClassifierKind::GaussianNaiveBayes);
        assert_eq!(model.name(), "gaussian_naive_bayes");

        let x = array![[0.0], [0.2], [5.0], [5.2]];
        model.fit(&x, &array![0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(model.predict(&array![[0.1], [5.1]]).unwrap(), array![0.0, 1.0]);
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: ClassifierKind = serde_json::from_str("\"gaussian_naive_bayes\"").unwrap();
        assert_eq!(kind, ClassifierKind::GaussianNaiveBayes);
        assert_eq!(
            serde_json::to_string(&ClassifierKind::LogisticRegression).unwrap(),
            "\"logistic_regression\""
        );
    }
}
