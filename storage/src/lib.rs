//! # BusConnect Storage
//!
//! File-backed persistence adapter: one JSON document per key under a
//! data directory, the local-storage analog for a terminal app.
//!
//! Writes go through a temp file and a rename so a crash mid-write
//! leaves the previous snapshot intact. A file that fails to parse is
//! reported as [`StorageError::Corrupt`]; hydration upstream treats
//! that the same as an absent key.
//!
//! ## Example
//!
//! ```ignore
//! use busconnect_storage::JsonFileStore;
//! use busconnect_core::storage::KeyValueStore;
//!
//! let store = JsonFileStore::open("./busconnect-data")?;
//! store.save("busconnect_passenger", &serde_json::json!({"ride_count": 0}))?;
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use busconnect_core::storage::{KeyValueStore, StorageError};

/// Key-value store of JSON files under one directory
///
/// Keys map to `<dir>/<key>.json`. Keys are restricted to a flat
/// alphanumeric/underscore/dash alphabet so a key can never name a path
/// outside the directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory the store writes into
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let flat = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !flat {
            return Err(StorageError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid storage key `{key}`"),
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(error) => Err(StorageError::Corrupt {
                key: key.to_owned(),
                reason: error.to_string(),
            }),
        }
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        let bytes = match serde_json::to_vec_pretty(value) {
            Ok(bytes) => bytes,
            Err(error) => {
                return Err(StorageError::Encode {
                    key: key.to_owned(),
                    reason: error.to_string(),
                });
            },
        };
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;
        tracing::debug!(key, path = %path.display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let value = json!({"ride_count": 3, "free_rides": 1});

        store.save("busconnect_passenger", &value).unwrap();
        let loaded = store.load("busconnect_passenger").unwrap();

        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn absent_key_loads_as_none() {
        let (_dir, store) = store();
        assert_eq!(store.load("busconnect_history").unwrap(), None);
    }

    #[test]
    fn save_replaces_previous_value() {
        let (_dir, store) = store();
        store.save("k", &json!(1)).unwrap();
        store.save("k", &json!(2)).unwrap();
        assert_eq!(store.load("k").unwrap(), Some(json!(2)));
    }

    #[test]
    fn corrupt_file_is_reported_not_parsed() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("bad.json"), b"{not json").unwrap();

        let error = store.load("bad").unwrap_err();
        assert!(matches!(error, StorageError::Corrupt { .. }));
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let (_dir, store) = store();
        assert!(store.load("../outside").is_err());
        assert!(store.save("a/b", &json!(1)).is_err());
        assert!(store.save("", &json!(1)).is_err());
    }

    #[test]
    fn reopening_sees_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.save("k", &json!([1, 2])).unwrap();
        }
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.load("k").unwrap(), Some(json!([1, 2])));
    }
}
