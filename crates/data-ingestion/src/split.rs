//! Seeded Train/Test Splitting

use crate::IngestionError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices assigned to each side of a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffled hold-out splitter keyed by a fixed seed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainTestSplit {
    /// Fraction of rows held out for testing
    pub test_ratio: f64,
    /// Seed for the row permutation
    pub seed: u64,
}

impl Default for TrainTestSplit {
    fn default() -> Self {
        Self {
            test_ratio: 0.30,
            seed: 42,
        }
    }
}

impl TrainTestSplit {
    /// Create a splitter
    pub fn new(test_ratio: f64, seed: u64) -> Self {
        Self { test_ratio, seed }
    }

    /// Number of test rows for `n_samples`: the ratio rounded up, leaving
    /// at least one row on each side
    pub fn test_size(&self, n_samples: usize) -> usize {
        let raw = (n_samples as f64 * self.test_ratio).ceil() as usize;
        raw.clamp(1, n_samples.saturating_sub(1).max(1))
    }

    /// Permute `0..n_samples` and cut it into test (first) and train (rest)
    pub fn split(&self, n_samples: usize) -> Result<SplitIndices, IngestionError> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(IngestionError::InvalidRatio(self.test_ratio));
        }
        if n_samples < 2 {
            return Err(IngestionError::TooFewRows(n_samples));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let n_test = self.test_size(n_samples);
        let train = indices.split_off(n_test);
        Ok(SplitIndices {
            train,
            test: indices,
        })
    }
}
