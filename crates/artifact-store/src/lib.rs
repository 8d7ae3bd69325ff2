//! Artifact Store
//!
//! Persists fitted pipeline components as named, versionless, single-slot
//! binary artifacts. Every write replaces the previous artifact atomically.

mod atomic;
mod store;

pub use atomic::write_atomic;
pub use store::{ArtifactStore, FileArtifactStore, MemoryArtifactStore, ARTIFACT_EXTENSION};

use std::path::PathBuf;
use thiserror::Error;

/// Artifact storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Artifact '{name}' not found")]
    Missing { name: String },
    #[error("Artifact '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },
    #[error("Failed to encode artifact '{name}': {reason}")]
    Encode { name: String, reason: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
