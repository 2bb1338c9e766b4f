//! Credential persistence for the ShopSense client.
//!
//! This crate provides:
//! - A `CredentialStorage` trait so tests can substitute an in-memory backend
//! - A durable JSON-file backend (`FileStorage`)
//! - A high-level `CredentialStore` that owns the one persisted credential

mod file;
mod keys;
mod store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use store::CredentialStore;
pub use traits::CredentialStorage;

use client_config_and_utils::Paths;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create a CredentialStore backed by the default credentials file.
pub fn create_credential_store(paths: &Paths) -> CredentialStore {
    let storage = FileStorage::new(paths.credentials_file());
    CredentialStore::new(Box::new(storage))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory storage for testing.
    pub struct MemoryStorage {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    impl CredentialStorage for MemoryStorage {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut data = self.data.lock().unwrap();
            data.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            let data = self.data.lock().unwrap();
            Ok(data.get(key).cloned())
        }

        fn delete(&self, key: &str) -> StorageResult<bool> {
            let mut data = self.data.lock().unwrap();
            Ok(data.remove(key).is_some())
        }
    }
}
