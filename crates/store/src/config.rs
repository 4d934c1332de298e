//! Cart store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE` - Storage backend, `file` or `memory` (default: file)
//! - `CART_DATA_DIR` - Directory for file-backed storage (default: data)

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which storage backend the cart persists into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// One file per key under [`CartConfig::data_dir`].
    #[default]
    File,
    /// Process-local memory, for tests and ephemeral sessions.
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unknown storage kind '{other}' (expected 'file' or 'memory')"
            )),
        }
    }
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storage backend to persist carts into.
    pub storage: StorageKind,
    /// Directory for file-backed storage.
    pub data_dir: PathBuf,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage = match get_optional_env("CART_STORAGE") {
            Some(raw) => raw
                .parse::<StorageKind>()
                .map_err(|e| ConfigError::InvalidEnvVar("CART_STORAGE".to_string(), e))?,
            None => StorageKind::default(),
        };
        let data_dir = PathBuf::from(get_env_or_default("CART_DATA_DIR", "data"));

        Ok(Self { storage, data_dir })
    }

    /// Build the storage backend this configuration describes.
    #[must_use]
    pub fn build_storage(&self) -> Arc<dyn KeyValueStorage> {
        match self.storage {
            StorageKind::File => Arc::new(FileStorage::new(self.data_dir.clone())),
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
