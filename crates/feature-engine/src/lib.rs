//! Feature Engineering Engine
//!
//! Turns census records into numeric feature matrices: imputation, ordinal
//! encoding, and standardization, fitted once on the training split.

mod encoder;
mod error;
mod imputer;
mod scaler;
mod statistics;
mod transformer;

pub use encoder::OrdinalEncoder;
pub use error::TransformError;
pub use imputer::{MedianImputer, MostFrequentImputer};
pub use scaler::StandardScaler;
pub use statistics::{median, most_frequent, ColumnStatistics};
pub use transformer::{Transformer, TransformerBuilder};
