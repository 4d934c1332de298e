//! PocketCart Store - Persistent cart state.
//!
//! This crate wires the pure cart model from `pocketcart-core` to an async
//! key-value storage backend and shares the result as a cheaply cloneable
//! handle. The in-memory cart is authoritative; every mutation writes the
//! full cart through to storage so it survives restarts.
//!
//! # Modules
//!
//! - [`store`] - The [`CartStore`] handle and its mutations
//! - [`storage`] - The [`KeyValueStorage`] trait plus memory and file backends
//! - [`scope`] - Task-scoped access to a shared store
//! - [`config`] - Backend selection from environment variables
//! - [`error`] - The store error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod scope;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, StorageKind};
pub use error::CartStoreError;
pub use scope::CartScope;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::CartStore;
