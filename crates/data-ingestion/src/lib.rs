//! Data Ingestion
//!
//! Reads the source census dataset, persists a raw copy, and writes a
//! reproducible train/test split as CSV artifacts.

mod ingest;
mod split;

pub use ingest::{DataIngestion, DatasetPreview, IngestionConfig, IngestionOutput};
pub use split::{SplitIndices, TrainTestSplit};

use artifact_store::StoreError;
use census_schema::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during ingestion
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to read source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    SplitUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("Source schema mismatch: {0}")]
    Schema(#[from] ValidationError),
    #[error("Failed to write split artifact: {0}")]
    Store(#[from] StoreError),
    #[error("Dataset has {0} rows; at least 2 are needed to split")]
    TooFewRows(usize),
    #[error("Test ratio {0} must lie strictly between 0 and 1")]
    InvalidRatio(f64),
}
