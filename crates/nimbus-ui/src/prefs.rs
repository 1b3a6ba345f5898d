//! Small key/value preference storage (the day/night flag lives here).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nimbus_core::StorageError;
use parking_lot::Mutex;
use serde_json::{Map, Value};

pub trait PreferenceStore: Send + Sync {
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Persist a value.
    ///
    /// # Errors
    /// Returns `StorageError` if the value could not be written.
    fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError>;
}

/// Preferences kept as one JSON object in a file, rewritten on each put.
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonPreferenceStore {
    /// Open the file; a missing file is an empty store.
    ///
    /// # Errors
    /// Returns `StorageError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| StorageError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(StorageError::Corrupt(format!(
                        "{} is not a JSON object",
                        path.display()
                    )))
                }
                Err(e) => return Err(StorageError::Corrupt(e.to_string())),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Like `open`, but falls back to an empty store on read errors.
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Failed to load preferences: {}. Using defaults.", e);
                Self {
                    path,
                    values: Mutex::new(Map::new()),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &Map<String, Value>) -> Result<(), StorageError> {
        let write_err = |message: String| StorageError::Write {
            path: self.path.display().to_string(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let contents =
            serde_json::to_string_pretty(values).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| write_err(e.to_string()))
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.lock().get(key).and_then(Value::as_bool)
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), Value::Bool(value));
        self.flush(&values)
    }
}

/// In-process preferences, lost on exit.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, bool>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.lock().get(key).copied()
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}
