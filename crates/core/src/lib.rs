//! PocketCart Core - Cart domain library.
//!
//! This crate provides the cart model shared across all PocketCart components:
//! - `store` - Persistent cart store for embedding in application shells
//! - `integration-tests` - End-to-end tests against real storage backends
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no async, no storage access. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Line-item types and the type-safe product ID
//! - [`cart`] - The cart itself and its transitions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError};
pub use types::*;
