//! Durable key/value storage for session credentials.
//!
//! This module provides:
//! - `KeyValueStore`: the persistence port (`get`/`set`/`remove`)
//! - `FileStore`: JSON file backend under the cache directory
//! - `KeyringStore`: OS keychain backend via `keyring`
//! - `MemoryStore`: ephemeral backend for one-off sessions and tests
//! - `CredentialStore`: facade owning the `token`/`user` key pair
//!
//! The token and serialized user are always written through immediately and
//! cleared together, so the store mirrors the live session across restarts.

pub mod file;
pub mod keyring;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::warn;

use crate::models::UserProfile;

pub use self::file::FileStore;
pub use self::keyring::KeyringStore;

/// Storage key for the bearer access token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user profile
pub const USER_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(String),
}

/// Persistence port for session credentials. Backends must be safe to share
/// across the async tasks that read tokens while a refresh writes them.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store with no persistence. Used when no durable directory is
/// available and throughout the test suites.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Facade over a `KeyValueStore` that owns the session's two keys.
///
/// Clone is cheap - the backend is shared behind an `Arc`.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Get the stored bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.backend.get(TOKEN_KEY)
    }

    /// Get the cached user profile, if any.
    /// An unparseable stored profile is treated as absent.
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.backend.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user profile is unreadable, ignoring");
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.backend.set(TOKEN_KEY, token)
    }

    pub fn set_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user)?;
        self.backend.set(USER_KEY, &raw)
    }

    /// Persist both halves of the session together (login path)
    pub fn set_session(&self, token: &str, user: &UserProfile) -> Result<(), StoreError> {
        self.set_token(token)?;
        self.set_user(user)
    }

    /// Remove the token and user together (logout / expiry path)
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored token");
        }
        if let Err(e) = self.backend.remove(USER_KEY) {
            warn!(error = %e, "Failed to remove stored user");
        }
    }
}
