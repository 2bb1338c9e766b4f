//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// The one persisted bearer credential
    pub const ACCESS_TOKEN: &'static str = "access_token";
}
