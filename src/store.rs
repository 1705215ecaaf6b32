//! Key-value persistence for settings and the task list.
//!
//! Values are stored as JSON. The file-backed store keeps one `<key>.json`
//! file per key inside the data directory and replaces it atomically on
//! every write. Reads happen once at startup; a missing or unreadable value
//! falls back to the caller-supplied default.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Storage key for the task list.
pub const TASKS_KEY: &str = "pomodoro-tasks";
/// Storage key for the settings object.
pub const SETTINGS_KEY: &str = "pomodoro-settings";

/// Raw key to JSON text storage.
pub trait KeyValueStore {
    /// Read the JSON text stored under `key`, or `None` on a miss.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the JSON text stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load the value stored under `key`, falling back to `default` on a miss or
/// when the stored value cannot be read or parsed.
pub fn load_or<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value is not valid, starting fresh");
                default
            }
        },
        Ok(None) => {
            debug!(key, "no stored value, using default");
            default
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read stored value, starting fresh");
            default
        }
    }
}

/// Serialize `value` and write it under `key`.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let data = serde_json::to_string_pretty(value)?;
    store.write(key, &data)
}

/// JSON files in a directory, one file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Atomic-ish write via temp + rename.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// Volatile store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_yields_default() {
        let store = MemoryStore::new();
        let value: Vec<u32> = load_or(&store, "nothing", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn corrupt_value_yields_default() {
        let store = MemoryStore::new();
        store.write("numbers", "{not json").unwrap();
        let value: Vec<u32> = load_or(&store, "numbers", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        save(&store, TASKS_KEY, &vec!["a", "b"]).unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        let value: Vec<String> = load_or(&reopened, TASKS_KEY, Vec::new());
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert!(reopened.path_for(TASKS_KEY).exists());
        assert!(!reopened.path_for(TASKS_KEY).with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("pomo");
        let store = JsonFileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.read(SETTINGS_KEY).unwrap(), None);
    }
}
