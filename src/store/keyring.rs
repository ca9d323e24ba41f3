use keyring::Entry;

use super::{KeyValueStore, StoreError};

/// Service name for keychain entries
const SERVICE_NAME: &str = "spendbook";

/// OS keychain backend. Each key maps to its own keychain entry under the
/// `spendbook` service, so the token never touches the filesystem.
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str) -> Result<Entry, StoreError> {
        Entry::new(SERVICE_NAME, key).map_err(|e| StoreError::Keychain(e.to_string()))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::entry(key).ok()?.get_password().ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::entry(key)?
            .set_password(value)
            .map_err(|e| StoreError::Keychain(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            // Removing an absent entry is not an error for a clear()
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Keychain(e.to_string())),
        }
    }
}
