//! Key-value persistence backing the catalog and favorites.
//!
//! Components receive an `Arc<dyn KeyValueStore>` and own the encoding of
//! their values; the store only moves strings.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::errors::StoreError;

/// Minimal string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "Read stored value");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Write next to the target and rename so a crash never leaves a torn file
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote stored value");
        Ok(())
    }
}

/// In-process store, used by tests and ephemeral deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `key = value`
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key_reads_none() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::open(dir.path())?;
        assert!(store.read("recipes")?.is_none());
        Ok(())
    }

    #[test]
    fn test_file_store_overwrites() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::open(dir.path().join("nested"))?;
        store.write("favorites", "{}")?;
        store.write("favorites", r#"{"1":[2]}"#)?;
        assert_eq!(store.read("favorites")?.as_deref(), Some(r#"{"1":[2]}"#));
        assert!(store.dir().join("favorites.json").exists());
        assert!(!store.dir().join("favorites.json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_memory_store() -> anyhow::Result<()> {
        let store = MemoryStore::with_value("a", "1");
        assert_eq!(store.read("a")?.as_deref(), Some("1"));
        assert!(store.read("b")?.is_none());
        store.write("b", "2")?;
        assert_eq!(store.read("b")?.as_deref(), Some("2"));
        Ok(())
    }
}
