//! Where the durable entry lives.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Name of the entry when none is configured.
pub const DEFAULT_KEY: &str = "todos";

/// Location of the single persisted entry: `<dir>/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The key must name a single file inside `dir`.
    pub fn validate(&self) -> Result<(), StorageError> {
        let key = self.key.as_str();
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']) {
            return Err(StorageError::InvalidKey(self.key.clone()));
        }
        Ok(())
    }

    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}
