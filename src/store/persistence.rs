//! Backing-file persistence for the record store.
//!
//! The file holds a single JSON object mapping collection names to arrays of
//! records. Writes go to a sibling `.tmp` file which is then renamed over the
//! target, so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Record, StoreError};

/// All collections of a store, keyed by name.
pub type Collections = BTreeMap<String, Vec<Record>>;

/// Load collections from `path`.
///
/// A missing file (or one holding only whitespace) yields an empty store.
pub fn load(path: &Path) -> Result<Collections, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No store file found, starting empty");
            return Ok(Collections::new());
        }
        Err(e) => return Err(io_error(path, e)),
    };

    if content.trim().is_empty() {
        return Ok(Collections::new());
    }

    let collections: Collections =
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.display().to_string(),
            source,
        })?;

    tracing::info!(
        path = %path.display(),
        collections = collections.len(),
        records = collections.values().map(Vec::len).sum::<usize>(),
        "Loaded store file"
    );
    Ok(collections)
}

/// Serialize every collection and atomically replace the file at `path`.
pub fn save(path: &Path, collections: &Collections) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(collections).map_err(StoreError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &bytes).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Store persisted");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("db.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");

        let mut collections = Collections::new();
        collections.insert(
            "tasks".to_string(),
            vec![record(json!({"id": "a", "title": "first"}))],
        );
        save(&path, &collections).unwrap();

        assert!(!temp_path(&path).exists());
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, collections);
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "\n").unwrap();

        assert!(load(&path).unwrap().is_empty());
    }
}
