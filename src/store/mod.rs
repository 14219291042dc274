//! Key/Value Store
//!
//! String-keyed storage with JSON-encoded string values, the same shape as
//! browser local storage:
//!
//! - **memory**: `MemoryStore`, process-local, used by tests
//! - **file**: `FileStore`, one JSON document on disk, used by the client
//! - **sqlite**: `SqliteStore`, a single `kv` table, used by the API server
//!
//! There are no cross-key transactions. Two writers racing on the same key
//! resolve as last-write-wins.
//!
//! # Well-known keys
//!
//! | Key           | Value                          |
//! |---------------|--------------------------------|
//! | `currentUser` | session marker (email)         |
//! | `userName`    | remote-sourced display name    |
//! | `feedbacks`   | ordered list of feedback       |
//! | `<email>`     | user record                    |

mod error;
mod file;
mod memory;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{de::DeserializeOwned, Serialize};

/// Key holding the logged-in user's email
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Key holding the display name returned by a remote login
pub const USER_NAME_KEY: &str = "userName";

/// Key holding the feedback list
pub const FEEDBACKS_KEY: &str = "feedbacks";

/// Synchronous string key/value storage
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> StoreResult<()>;

    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

/// Typed JSON access on top of any [`KeyValueStore`]
pub trait JsonStoreExt: KeyValueStore {
    /// Read and decode the JSON value under `key`
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get_item(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and store it under `key`
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json_roundtrip_through_trait() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "eco".to_string(),
            count: 3,
        };

        store.set_json("sample", &sample).unwrap();
        let loaded: Option<Sample> = store.get_json("sample").unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_get_json_missing_key() {
        let store = MemoryStore::new();
        let loaded: Option<Sample> = store.get_json("missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_json_rejects_garbage() {
        let store = MemoryStore::new();
        store.set_item("sample", "{not json").unwrap();
        let result: StoreResult<Option<Sample>> = store.get_json("sample");
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_contains_key_default() {
        let store = MemoryStore::new();
        assert!(!store.contains_key(CURRENT_USER_KEY).unwrap());
        store.set_item(CURRENT_USER_KEY, "asha@gmail.com").unwrap();
        assert!(store.contains_key(CURRENT_USER_KEY).unwrap());
    }
}
