//! High-level API for the persisted credential.

use crate::{CredentialStorage, StorageKeys, StorageResult};
use tracing::warn;

/// High-level store for the single persisted bearer credential.
///
/// `load` is deliberately infallible: a broken storage medium must read as
/// "no credential" so the client fails safe to the logged-out state.
pub struct CredentialStore {
    storage: Box<dyn CredentialStorage>,
}

impl CredentialStore {
    /// Create a new store with the given storage backend.
    pub fn new(storage: Box<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted credential, if any.
    ///
    /// A storage failure is logged and reported as `None`.
    pub fn load(&self) -> Option<String> {
        match self.storage.get(StorageKeys::ACCESS_TOKEN) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted credential, treating as absent");
                None
            }
        }
    }

    /// Persist a credential, overwriting any existing value.
    pub fn save(&self, credential: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::ACCESS_TOKEN, credential)
    }

    /// Remove the persisted credential. Idempotent.
    pub fn clear(&self) -> StorageResult<()> {
        let _ = self.storage.delete(StorageKeys::ACCESS_TOKEN)?;
        Ok(())
    }
}
