//! Error type for cart store operations.

use pocketcart_core::CartError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by [`CartStore`] operations.
///
/// [`CartStore`]: crate::store::CartStore
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// A cart transition was rejected, e.g. the targeted product is not in
    /// the cart.
    #[error(transparent)]
    Cart(#[from] CartError),
    /// The storage backend failed to read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A persisted record existed but could not be decoded as a cart.
    #[error("persisted cart record is corrupt: {0}")]
    Corrupt(String),
    /// The cart was used outside of [`CartScope::provide`].
    ///
    /// [`CartScope::provide`]: crate::scope::CartScope::provide
    #[error("cart used outside of a cart scope")]
    OutsideScope,
}
