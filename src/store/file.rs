use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::{KeyValueStore, StoreError};

/// Store file name in the cache directory
const STORE_FILE: &str = "session.json";

/// JSON file backend. The whole map is rewritten on every mutation so the
/// on-disk state never lags the live session.
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store file under `dir`
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        let path = dir.join(STORE_FILE);
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::open(dir.path().to_path_buf()).unwrap();
            store.set("token", "tok-1").unwrap();
            store.set("user", "{\"id\":1}").unwrap();
        }

        let store = FileStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.get("token").as_deref(), Some("tok-1"));
        assert_eq!(store.get("user").as_deref(), Some("{\"id\":1}"));
    }

    #[test]
    fn test_remove_is_durable() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::open(dir.path().to_path_buf()).unwrap();
            store.set("token", "tok-1").unwrap();
            store.remove("token").unwrap();
        }

        let store = FileStore::open(dir.path().to_path_buf()).unwrap();
        assert!(store.get("token").is_none());
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).unwrap();
        assert!(store.get("token").is_none());
    }
}
