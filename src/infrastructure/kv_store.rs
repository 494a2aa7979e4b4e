use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::ports::KeyValueStore;

/// One JSON file per key under a data directory. This is the durable local
/// store the cart, session, and wishlist blobs live in; it survives restarts
/// but is scoped to one deployment and not synchronized with anything.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| DomainError::Storage(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::Storage(format!("read {}: {}", path.display(), e)))
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| DomainError::Storage(format!("parse {}: {}", path.display(), e)))
    }

    fn put(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| DomainError::Storage(format!("encode '{}': {}", key, e)))?;
        fs::write(&path, bytes)
            .map_err(|e| DomainError::Storage(format!("write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!("remove {}: {}", path.display(), e))),
        }
    }
}

/// The in-memory substitute tests inject in place of the file store.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, DomainError> {
        self.map
            .lock()
            .map_err(|_| DomainError::Storage("store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<(), DomainError> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn file_store_roundtrips_blobs_under_fixed_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path()).expect("store");

        store.put("cart", json!({"lines": []})).expect("put");

        assert_eq!(store.get("cart").expect("get"), Some(json!({"lines": []})));
        assert_eq!(store.get("user").expect("get"), None);
    }

    #[test]
    fn file_store_survives_reopening() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = JsonFileStore::new(dir.path()).expect("store");
            store.put("wishlist", json!(["a"])).expect("put");
        }
        let reopened = JsonFileStore::new(dir.path()).expect("reopen");
        assert_eq!(reopened.get("wishlist").expect("get"), Some(json!(["a"])));
    }

    #[test]
    fn file_store_remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path()).expect("store");
        store.put("cart", json!(1)).expect("put");

        store.remove("cart").expect("first remove");
        store.remove("cart").expect("second remove");

        assert_eq!(store.get("cart").expect("get"), None);
    }

    #[test]
    fn corrupt_blob_is_a_storage_error_not_a_fresh_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path()).expect("store");
        fs::write(dir.path().join("cart.json"), b"{not json").expect("write garbage");

        assert!(matches!(store.get("cart"), Err(DomainError::Storage(_))));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::default();
        store.put("user", json!({"id": 1})).expect("put");
        assert_eq!(store.get("user").expect("get"), Some(json!({"id": 1})));
        store.remove("user").expect("remove");
        assert_eq!(store.get("user").expect("get"), None);
    }
}
