//! Missing-Value Imputation

use crate::statistics::{median, most_frequent};
use crate::TransformError;
use serde::{Deserialize, Serialize};

/// Fills missing numeric values with the fit-time median of each column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: Vec<f64>,
}

impl MedianImputer {
    /// Learn one median per column from the observed values.
    ///
    /// `columns[i]` yields the cells of column `i`; `names[i]` labels it.
    pub fn fit(
        columns: &[Vec<Option<f64>>],
        names: &[&'static str],
    ) -> Result<Self, TransformError> {
        let medians = columns
            .iter()
            .zip(names)
            .map(|(cells, &name)| {
                let observed: Vec<f64> = cells.iter().flatten().copied().collect();
                median(&observed).ok_or(TransformError::EmptyColumn(name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { medians })
    }

    /// Replace a missing cell of column `column`
    pub fn fill(&self, column: usize, value: Option<f64>) -> f64 {
        value.unwrap_or(self.medians[column])
    }

    /// Learned medians in column order
    pub fn medians(&self) -> &[f64] {
        &self.medians
    }
}

/// Fills missing categorical values with the fit-time mode of each column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostFrequentImputer {
    modes: Vec<String>,
}

impl MostFrequentImputer {
    /// Learn one mode per column from the observed values
    pub fn fit(
        columns: &[Vec<Option<&str>>],
        names: &[&'static str],
    ) -> Result<Self, TransformError> {
        let modes = columns
            .iter()
            .zip(names)
            .map(|(cells, &name)| {
                most_frequent(cells.iter().flatten().copied())
                    .ok_or(TransformError::EmptyColumn(name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { modes })
    }

    /// Replace a missing cell of column `column`
    pub fn fill<'a>(&'a self, column: usize, value: Option<&'a str>) -> &'a str {
        value.unwrap_or(&self.modes[column])
    }

    /// Learned modes in column order
    pub fn modes(&self) -> &[String] {
        &self.modes
    }
}
