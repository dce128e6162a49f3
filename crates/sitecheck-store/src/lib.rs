//! Persistent key-value store
//!
//! The inspection collection is kept as an opaque string under a single key.
//! `FileKeyValueStore` keeps every key in one JSON object on disk and flushes
//! on each write; `MemoryKeyValueStore` is the in-process equivalent.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use sitecheck_types::{Result, StoreError};

/// File name of the on-disk store inside the store directory
pub const STORE_FILE_NAME: &str = "store.json";

/// Key-value persistence boundary
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; returns whether it existed
    fn delete(&self, key: &str) -> Result<bool>;

    /// List keys, optionally restricted to those starting with `prefix`
    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>>;
}

fn matching_keys(entries: &BTreeMap<String, String>, prefix: Option<&str>) -> Vec<String> {
    entries
        .keys()
        .filter(|k| prefix.map(|p| k.starts_with(p)).unwrap_or(true))
        .cloned()
        .collect()
}

/// File-backed store: one JSON object mapping keys to values
pub struct FileKeyValueStore {
    store_path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Create or load a store in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(STORE_FILE_NAME);

        let entries = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| StoreError::Corrupted {
                path: store_path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %store_path.display(), "opened key-value store");

        Ok(Self {
            store_path,
            entries: RefCell::new(entries),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// Write the whole map to disk
    fn flush(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.entries.borrow())?;
        tracing::debug!(path = %self.store_path.display(), "flushed key-value store");
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        Ok(matching_keys(&self.entries.borrow(), prefix))
    }
}

/// Non-durable store, used in tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        Ok(matching_keys(&self.entries.borrow(), prefix))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        (**self).list(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_types::Error;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempdir().unwrap();
        {
            let store = FileKeyValueStore::open(dir.path().to_path_buf()).unwrap();
            store.set("inspections", "[]").unwrap();
        }
        let store = FileKeyValueStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.get("inspections").unwrap(), Some("[]".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_delete_and_list() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path().to_path_buf()).unwrap();
        store.set("bcs-inspections", "a").unwrap();
        store.set("bcs-settings", "b").unwrap();
        store.set("other", "c").unwrap();

        assert_eq!(
            store.list(Some("bcs-")).unwrap(),
            vec!["bcs-inspections".to_string(), "bcs-settings".to_string()]
        );
        assert_eq!(store.list(None).unwrap().len(), 3);

        assert!(store.delete("other").unwrap());
        assert!(!store.delete("other").unwrap());

        let reopened = FileKeyValueStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.list(None).unwrap().len(), 2);
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE_NAME), "{not json").unwrap();

        let result = FileKeyValueStore::open(dir.path().to_path_buf());
        assert!(matches!(result, Err(Error::Store(StoreError::Corrupted { .. }))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
        assert!(store.delete("k").unwrap());
        assert!(store.get("k").unwrap().is_none());
    }
}
