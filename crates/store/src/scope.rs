//! Task-scoped access to a shared cart store.
//!
//! Mirrors the provider pattern of UI shells: the application root provides
//! the store once, and any code running inside that scope grabs the handle
//! without threading it through every call.

use std::future::Future;

use tokio::task_local;

use crate::error::CartStoreError;
use crate::store::CartStore;

task_local! {
    static CURRENT_CART: CartStore;
}

/// Task-scoped access to a [`CartStore`].
///
/// [`CartScope::provide`] pins a store to the current task for the duration
/// of a future; [`CartScope::current`] retrieves it from anywhere inside.
/// There is no global fallback: calling `current` outside a providing scope
/// is a wiring bug in the embedding application and surfaces as
/// [`CartStoreError::OutsideScope`].
///
/// Scopes are per task. Work spawned with `tokio::spawn` does not inherit
/// the scope; pass a [`CartStore`] clone into spawned tasks instead.
///
/// ## Examples
///
/// ```
/// use std::sync::Arc;
/// use pocketcart_store::{CartScope, CartStore, MemoryStorage};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = CartStore::new(Arc::new(MemoryStorage::new()));
/// let total = CartScope::provide(store, async {
///     let store = CartScope::current()?;
///     Ok::<_, pocketcart_store::CartStoreError>(store.total_quantity().await)
/// })
/// .await
/// .unwrap();
/// assert_eq!(total, 0);
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CartScope;

impl CartScope {
    /// Run `fut` with `store` available as the current cart store.
    ///
    /// Scopes nest; the innermost provided store wins.
    pub async fn provide<F>(store: CartStore, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(store, fut).await
    }

    /// The store provided by the nearest enclosing [`CartScope::provide`].
    ///
    /// The returned handle is a clone sharing the scoped store's cart, so it
    /// can be held across awaits or moved into spawned work.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::OutsideScope`] when no scope is active on
    /// the current task.
    pub fn current() -> Result<CartStore, CartStoreError> {
        CURRENT_CART
            .try_with(Clone::clone)
            .map_err(|_| CartStoreError::OutsideScope)
    }
}
