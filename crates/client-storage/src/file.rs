//! JSON-file storage backend.

use crate::{CredentialStorage, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Durable storage backed by a single JSON object file.
///
/// The whole file is rewritten on every mutation. Values are plain strings
/// keyed by [`crate::StorageKeys`] constants.
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Create a storage handle for the given file path.
    ///
    /// The file is created lazily on the first `set`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| StorageError::Encoding(e.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read_map()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.read_map().unwrap_or_default();
        let removed = map.remove(key).is_some();
        if removed {
            self.write_map(&map)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_delete_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("credentials.json"));

        assert_eq!(storage.get("access_token").unwrap(), None);

        storage.set("access_token", "tok-1").unwrap();
        assert_eq!(
            storage.get("access_token").unwrap(),
            Some("tok-1".to_string())
        );

        assert!(storage.delete("access_token").unwrap());
        assert_eq!(storage.get("access_token").unwrap(), None);
        assert!(!storage.delete("access_token").unwrap());
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("credentials.json"));

        storage.set("access_token", "tok-old").unwrap();
        storage.set("access_token", "tok-new").unwrap();

        assert_eq!(
            storage.get("access_token").unwrap(),
            Some("tok-new".to_string())
        );
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        {
            let storage = FileStorage::new(path.clone());
            storage.set("access_token", "tok-persist").unwrap();
        }

        let storage = FileStorage::new(path);
        assert_eq!(
            storage.get("access_token").unwrap(),
            Some("tok-persist".to_string())
        );
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("credentials.json");
        let storage = FileStorage::new(path.clone());

        storage.set("access_token", "tok-1").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_encoding_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json at all").unwrap();

        let storage = FileStorage::new(path);
        assert!(matches!(
            storage.get("access_token"),
            Err(StorageError::Encoding(_))
        ));
    }

    #[test]
    fn test_set_recovers_from_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{{{{").unwrap();

        let storage = FileStorage::new(path);
        storage.set("access_token", "tok-fresh").unwrap();
        assert_eq!(
            storage.get("access_token").unwrap(),
            Some("tok-fresh".to_string())
        );
    }
}
