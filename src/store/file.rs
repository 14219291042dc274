//! File-backed key/value store
//!
//! Keeps every item in one JSON object on disk. The whole document is loaded
//! on open and rewritten on every mutation (temp file + rename), so a crash
//! mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{KeyValueStore, StoreError, StoreResult};

/// Default file name inside the data directory
pub const STORE_FILE_NAME: &str = "local_storage.json";

/// JSON document store, the client's stand-in for browser local storage
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store file at `path`
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let items = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = ?path, items = items.len(), "Opened file store");

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Open the default store file inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> StoreResult<Self> {
        Self::open(data_dir.join(STORE_FILE_NAME))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path()).unwrap();
        assert!(store.get_item("anything").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::in_dir(dir.path()).unwrap();
            store.set_item("currentUser", "asha@gmail.com").unwrap();
            store.set_item("userName", "Asha").unwrap();
            store.remove_item("userName").unwrap();
        }

        let reopened = FileStore::in_dir(dir.path()).unwrap();
        assert_eq!(
            reopened.get_item("currentUser").unwrap().as_deref(),
            Some("asha@gmail.com")
        );
        assert!(reopened.get_item("userName").unwrap().is_none());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set_item("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, "[1, 2").unwrap();

        let result = FileStore::open(&path);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
