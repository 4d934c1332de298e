//! Core types for PocketCart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod line_item;

pub use id::ProductId;
pub use line_item::{LineItem, NewLineItem};
