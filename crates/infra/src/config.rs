//! Configuration loading and representation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopbill_observability::ObservabilityConfig;

use crate::persistence::{FileAdapter, InMemoryAdapter, PersistenceError, SharedAdapter};
use crate::shop::Shop;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the two collections live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    pub inventory_key: String,
    pub bill_key: String,
    /// Directory for `<key>.json` files. Unset keeps everything in memory.
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            inventory_key: "items".to_string(),
            bill_key: "billItems".to_string(),
            data_dir: None,
        }
    }
}

impl StorageConfig {
    /// Adapter for the configured backend.
    pub fn adapter(&self) -> SharedAdapter {
        match &self.data_dir {
            Some(dir) => Arc::new(FileAdapter::new(dir)),
            None => Arc::new(InMemoryAdapter::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl ShopConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Open both stores on the configured backend.
    pub async fn open_stores(&self) -> Result<Shop, PersistenceError> {
        Shop::open_with(self.storage.adapter(), &self.storage).await
    }
}
