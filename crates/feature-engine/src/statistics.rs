//! Column Statistics Computation

use std::collections::BTreeMap;

/// Location and spread of a numeric column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStatistics {
    /// Number of values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        let std_dev = (m2 / n).sqrt();

        Self {
            count: values.len(),
            mean,
            std_dev,
            min,
            max,
        }
    }
}

/// Median of the values; the two middle values are averaged on even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties resolve to the lexicographically smallest
pub fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    // BTreeMap iterates in key order, so the first maximum wins ties
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
