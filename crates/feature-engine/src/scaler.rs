//! Standardization to Zero Mean and Unit Variance

use crate::statistics::ColumnStatistics;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column z-score scaler with statistics frozen at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Learn column means and population standard deviations.
    ///
    /// Constant columns get a scale of 1.0 so they map to zero.
    pub fn fit(data: &Array2<f64>) -> Self {
        let mut means = Vec::with_capacity(data.ncols());
        let mut scales = Vec::with_capacity(data.ncols());
        for column in data.axis_iter(Axis(1)) {
            let values: Vec<f64> = column.iter().copied().collect();
            let stats = ColumnStatistics::compute(&values);
            means.push(stats.mean);
            scales.push(if stats.std_dev < 10.0 * f64::EPSILON {
                1.0
            } else {
                stats.std_dev
            });
        }
        Self { means, scales }
    }

    /// Identity scaler for `n_columns` columns
    pub fn identity(n_columns: usize) -> Self {
        Self {
            means: vec![0.0; n_columns],
            scales: vec![1.0; n_columns],
        }
    }

    /// Standardize in place
    pub fn transform(&self, data: &mut Array2<f64>) {
        for (j, mut column) in data.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, scale) = (self.means[j], self.scales[j]);
            column.mapv_inplace(|v| (v - mean) / scale);
        }
    }

    /// Column means
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Column scales
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}
