//! Persistent user settings
//!
//! Settings live in a flat JSON object. The export engine only reads them;
//! they are changed through the host's settings screen (or `modprof settings`).

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Export local packages as an archive instead of index links
pub const INCLUDE_LOCAL_MODS: &str = "include-local-mods";

/// Host used in manifest links
pub const INDEX_HOST: &str = "index-host";

/// Directory holding installed mod packages
pub const MODS_DIR: &str = "mods-dir";

/// Errors from the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Settings file {0} does not contain a JSON object")]
    NotAnObject(PathBuf),
}

/// Read access to persisted settings
pub trait SettingsStore: Send + Sync {
    /// Raw value stored under `key`
    fn get(&self, key: &str) -> Option<Value>;

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }

    /// Whether exports bundle local packages; off unless set
    fn include_local_mods(&self) -> bool {
        self.get_bool(INCLUDE_LOCAL_MODS).unwrap_or(false)
    }
}

/// Settings backed by a JSON file
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonSettings {
    /// Load settings from `path`; a missing file yields empty settings
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str(&content) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => return Err(SettingsError::NotAnObject(path)),
                    Err(source) => return Err(SettingsError::Json { path, source }),
                }
            }
        } else {
            log::debug!("Settings file {} does not exist yet", path.display());
            Map::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Location of the settings file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a value and write the file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), SettingsError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.into());
        self.save(&values)
    }

    /// Remove a value and write the file
    ///
    /// Returns the previous value, if any.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn remove(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = values.remove(key);
        if previous.is_some() {
            self.save(&values)?;
        }
        Ok(previous)
    }

    /// All stored values, sorted by key
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<_> = values.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn save(&self, values: &Map<String, Value>) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(values).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> Option<Value> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.get(key).cloned()
    }
}
