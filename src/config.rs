//! Runtime configuration.

use std::path::PathBuf;

use anyhow::Result;

/// Storage key the technology list lives under.
pub const DEFAULT_STORAGE_KEY: &str = "technologies";

/// Where and under which key the technology list is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the SQLite file backing the key-value store.
    pub data_path: PathBuf,
    pub storage_key: String,
}

impl Config {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            data_path,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Configuration rooted in the platform data directory.
    pub fn load_default() -> Result<Self> {
        Ok(Self::new(Self::default_data_path()?))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "techtrack")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("techtrack.db"))
    }

    /// Applies command-line or environment overrides on top of the defaults.
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, storage_key: Option<String>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(key) = storage_key.filter(|k| !k.trim().is_empty()) {
            self.storage_key = key;
        }
        self
    }
}
