//! Integration tests for PocketCart.
//!
//! End-to-end coverage of the persistent cart store against real storage
//! backends: hydration, write-through persistence, recovery from bad
//! records, concurrent mutation ordering, and scoped access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocketcart-integration-tests
//! ```
//!
//! No external services are required; the file backend runs against a
//! per-test temporary directory.
//!
//! # Test Categories
//!
//! - `cart_persistence` - Hydration, write-through and record format
//! - `cart_concurrency` - Lost-update and write-ordering guarantees
//! - `cart_scope` - Task-scoped store access
//!
//! This library holds the shared test plumbing: tracing setup, item
//! builders, and storage test doubles with failure injection.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use pocketcart_core::NewLineItem;
use pocketcart_store::{KeyValueStorage, MemoryStorage, StorageError};

/// Initialize tracing for a test binary. Safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Build a line-item input with a price given in cents.
#[must_use]
pub fn item(id: &str, title: &str, cents: i64) -> NewLineItem {
    NewLineItem::new(id, title, format!("images/{id}.png"), Decimal::new(cents, 2))
}

/// In-memory storage that additionally keeps every value ever written, in
/// write order. Lets tests assert exactly what reached the backend and when.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    entries: RwLock<HashMap<String, String>>,
    history: RwLock<Vec<String>>,
}

impl RecordingStorage {
    /// Create a new empty recording storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value written with `set`, oldest first.
    pub async fn history(&self) -> Vec<String> {
        self.history.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStorage for RecordingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        self.history.write().await.push(value.to_owned());
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// Storage with switchable failure injection, for exercising how the store
/// behaves against a degraded backend.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStorage {
    /// Create a new storage with all operations succeeding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStorage for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("injected read failure".to_owned()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("injected write failure".to_owned()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
