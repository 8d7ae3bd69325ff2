//! Atomic Replace-on-Write

use crate::StoreError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `bytes` to `path` so readers never observe a partial file.
///
/// The content goes to a sibling `.tmp` file first, is synced, and is then
/// renamed over the destination. Parent directories are created as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let temp_path = temp_path_for(path);
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(io_err(&temp_path))?;
    file.write_all(bytes).map_err(io_err(&temp_path))?;
    file.sync_all().map_err(io_err(&temp_path))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(io_err(path))?;
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("train.csv");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        let temp = temp_path_for(Path::new("artifacts/model.bin"));
        assert_eq!(temp, PathBuf::from("artifacts/model.bin.tmp"));
    }
}
