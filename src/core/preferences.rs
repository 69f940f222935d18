//! Persistent preference store

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};

/// Enables the LibreTranslate engine
pub const ALLOW_LIBRE_TRANSLATE: &str = "allow.libre.translate";
/// Server endpoint used for requests
pub const LIBRE_TRANSLATE_SERVER_URL: &str = "libre.translate.server.url";
/// `get` or `post`
pub const LIBRE_TRANSLATE_TRANSPORT: &str = "libre.translate.transport";
/// `auto`, `flat` or `list`
pub const LIBRE_TRANSLATE_RESPONSE_SHAPE: &str = "libre.translate.response.shape";
/// Optional API key for hosted instances
pub const LIBRE_TRANSLATE_API_KEY: &str = "libre.translate.api.key";

/// Flat key/value preferences persisted as a JSON object
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    /// Backing file; `None` for an in-memory store
    path: Option<PathBuf>,
    /// Key/value pairs
    values: BTreeMap<String, Value>,
}

impl Preferences {
    /// Store with no backing file
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Default location under the user's config directory
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("libre-translator").join("preferences.json"))
            .ok_or_else(|| TranslationError::ConfigError {
                message: "Cannot determine the user config directory".to_string(),
            })
    }

    /// Load from a JSON file; a missing file yields an empty store bound to `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No preferences at {}, starting empty", path.display());
            return Ok(Self {
                path: Some(path.to_path_buf()),
                values: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let values: BTreeMap<String, Value> =
            serde_json::from_str(&content).map_err(|e| TranslationError::PreferenceError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        debug!("Loaded {} preferences from {}", values.len(), path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Write back to the file this store was loaded from
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            debug!("In-memory preferences, nothing to save");
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content)?;
        info!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// String value of `key`, empty when unset
    pub fn get_preference(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// String value of `key`, or `default` when unset or empty
    pub fn get_preference_default(&self, key: &str, default: &str) -> String {
        let value = self.get_preference(key);
        if value.trim().is_empty() {
            default.to_string()
        } else {
            value
        }
    }

    /// Boolean flag; accepts `true` and `"true"`
    pub fn is_preference(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Set `key` in memory; call [`Preferences::save`] to persist
    pub fn set_preference(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        debug!("Set preference {} = {}", key, value);
        self.values.insert(key.to_string(), value);
    }

    /// Raw JSON view of the whole store
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.values).unwrap_or(Value::Null)
    }
}
