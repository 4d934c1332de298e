//! Async key-value storage the cart persists into.
//!
//! The cart store works against the small [`KeyValueStorage`] trait rather
//! than a concrete backend, mirroring the string get/set/remove surface of
//! the local stores that mobile and browser shells provide. Two backends
//! ship here: [`MemoryStorage`] for tests and ephemeral sessions, and
//! [`FileStorage`] for carts that survive restarts.

use async_trait::async_trait;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage keys used by the cart store.
pub mod keys {
    /// Key the cart record is persisted under.
    pub const CART: &str = "Products";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is empty or not safe for the backend to use.
    #[error("invalid storage key: {reason}")]
    InvalidKey {
        /// What made the key unusable.
        reason: String,
    },
    /// The backend failed to read or write.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Backend-specific failure that is not an I/O error.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// An async string key-value store.
///
/// `get` returns `None` for a key that was never written or has been
/// removed; values are opaque to the storage. Implementations must make a
/// completed `set` visible to every later `get`.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is unusable or the backend
    /// cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is unusable or the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key is unusable or the delete fails.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
