//! Hold-out evaluation metrics

use crate::TrainingError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Confusion matrix counts with class 1 (`>50K`) as positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

/// Test-split metrics reported after training
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub samples: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionCounts,
}

impl Evaluation {
    /// Compare predictions against ground truth
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self, TrainingError> {
        if y_true.len() != y_pred.len() {
            return Err(TrainingError::ShapeMismatch {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }

        let mut confusion = ConfusionCounts::default();
        for (&truth, &pred) in y_true.iter().zip(y_pred.iter()) {
            match (truth >= 0.5, pred >= 0.5) {
                (true, true) => confusion.true_positive += 1,
                (false, true) => confusion.false_positive += 1,
                (false, false) => confusion.true_negative += 1,
                (true, false) => confusion.false_negative += 1,
            }
        }

        let samples = y_true.len();
        let tp = confusion.true_positive as f64;
        let accuracy = ratio(tp + confusion.true_negative as f64, samples as f64);
        let precision = ratio(tp, tp + confusion.false_positive as f64);
        let recall = ratio(tp, tp + confusion.false_negative as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);

        Ok(Self {
            samples,
            accuracy,
            precision,
            recall,
            f1,
            confusion,
        })
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_metrics() {
        let truth = array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let preds = array![1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0];
        let eval = Evaluation::compute(&truth, &preds).unwrap();

        assert_eq!(
            eval.confusion,
            ConfusionCounts {
                true_positive: 3,
                false_positive: 1,
                true_negative: 3,
                false_negative: 1,
            }
        );
        assert_eq!(eval.samples, 8);
        assert!((eval.accuracy - 0.75).abs() < 1e-12);
        assert!((eval.precision - 0.75).abs() < 1e-12);
        assert!((eval.recall - 0.75).abs() < 1e-12);
        assert!((eval.f1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_no_positive_predictions() {
        let eval = Evaluation::compute(&array![1.0, 0.0], &array![0.0, 0.0]).unwrap();
        assert_eq!(eval.precision, 0.0);
        assert_eq!(eval.recall, 0.0);
        assert_eq!(eval.f1, 0.0);
        assert!((eval.accuracy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(Evaluation::compute(&array![1.0], &array![1.0, 0.0]).is_err());
    }
}
