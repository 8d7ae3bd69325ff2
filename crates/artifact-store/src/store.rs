//! Artifact Store Implementations

use crate::atomic::write_atomic;
use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// File extension of persisted artifacts
pub const ARTIFACT_EXTENSION: &str = "bin";

/// Named binary object persistence.
///
/// Implementors move raw bytes; encoding is shared through the provided
/// `save` / `load` methods so every store uses the same binary format.
pub trait ArtifactStore: Send + Sync {
    /// Replace the artifact `name` with `bytes`
    fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the artifact `name`
    fn read_bytes(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Whether the artifact `name` currently exists
    fn exists(&self, name: &str) -> bool;

    /// Serialize and persist a value
    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let bytes = postcard::to_allocvec(value).map_err(|e| StoreError::Encode {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.write_bytes(name, &bytes)?;
        debug!("Saved artifact '{}' ({} bytes)", name, bytes.len());
        Ok(())
    }

    /// Load and deserialize a value
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError>
    where
        Self: Sized,
    {
        let bytes = self.read_bytes(name)?;
        postcard::from_bytes(&bytes).map_err(|e| StoreError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Stores artifacts as `<dir>/<name>.bin`
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("Using artifact directory {}", dir.display());
        Self { dir }
    }

    /// Root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the artifact `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, ARTIFACT_EXTENSION))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        write_atomic(&self.path_for(name), bytes)
    }

    fn read_bytes(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(name);
        std::fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::Missing {
                name: name.to_string(),
            },
            _ => StoreError::Io { path, source },
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}

/// In-memory store; clones share the same slots
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryArtifactStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether no artifact is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned(name: &str) -> StoreError {
        StoreError::Io {
            path: PathBuf::from(name),
            source: std::io::Error::new(ErrorKind::Other, "artifact store lock poisoned"),
        }
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().map_err(|_| Self::poisoned(name))?;
        slots.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_bytes(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let slots = self.slots.lock().map_err(|_| Self::poisoned(name))?;
        slots.get(name).cloned().ok_or_else(|| StoreError::Missing {
            name: name.to_string(),
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.slots
            .lock()
            .map(|s| s.contains_key(name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Fitted {
        means: Vec<f64>,
        label: String,
    }

    fn sample() -> Fitted {
        Fitted {
            means: vec![38.58, 189778.36, -0.125],
            label: "scaler".to_string(),
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path().join("artifacts"));

        assert!(!store.exists("preprocessor"));
        store.save("preprocessor", &sample()).unwrap();
        assert!(store.exists("preprocessor"));
        assert!(store.path_for("preprocessor").ends_with("preprocessor.bin"));

        let loaded: Fitted = store.load("preprocessor").unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path());

        store.save("model", &sample()).unwrap();
        let replacement = Fitted {
            means: vec![1.0],
            label: "second".to_string(),
        };
        store.save("model", &replacement).unwrap();

        let loaded: Fitted = store.load("model").unwrap();
        assert_eq!(loaded, replacement);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path());
        let result: Result<Fitted, _> = store.load("model");
        assert!(matches!(result, Err(StoreError::Missing { .. })));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path());
        std::fs::write(store.path_for("model"), [0xff, 0xff, 0xff]).unwrap();
        let result: Result<Fitted, _> = store.load("model");
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_memory_store_shares_slots() {
        let store = MemoryArtifactStore::new();
        let clone = store.clone();
        store.save("model", &sample()).unwrap();

        assert!(clone.exists("model"));
        assert_eq!(clone.len(), 1);
        let loaded: Fitted = clone.load("model").unwrap();
        assert_eq!(loaded, sample());
        assert!(matches!(
            clone.load::<Fitted>("preprocessor"),
            Err(StoreError::Missing { .. })
        ));
    }
}
