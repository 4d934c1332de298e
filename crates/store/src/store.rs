//! The persistent cart store.

use std::fmt;
use std::sync::Arc;

use pocketcart_core::{Cart, LineItem, NewLineItem, ProductId};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::CartStoreError;
use crate::storage::{keys, KeyValueStorage};

/// Persistent cart state shared across an application.
///
/// The store keeps the cart in memory and writes the full cart through to
/// its storage backend after every mutation. It is cheaply cloneable via
/// `Arc`; every clone sees and mutates the same cart.
///
/// # Concurrency
///
/// Mutations serialize on an internal async lock and hold it across the
/// write-through. Each mutation therefore reads the latest committed state,
/// each persisted record is exactly the state that mutation produced, and
/// records reach storage in commit order. Two tasks mutating concurrently
/// can never clobber each other with a stale snapshot.
///
/// # Persistence failures
///
/// The in-memory cart is authoritative. When a write-through fails the
/// mutation still counts; the failure is logged and the next successful
/// write repairs the stored record, since records are whole-cart snapshots.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn KeyValueStorage>,
    cart: Mutex<Cart>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store with an empty cart, without touching storage.
    ///
    /// Most callers want [`CartStore::load`] instead, which hydrates the
    /// cart persisted by a previous run.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_cart(storage, Cart::new())
    }

    fn with_cart(storage: Arc<dyn KeyValueStorage>, cart: Cart) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Create a store hydrated from the persisted cart record.
    ///
    /// A missing record yields an empty cart. A record that exists but does
    /// not decode as a well-formed cart is logged and treated as missing;
    /// the next mutation overwrites it with a valid one.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Storage`] if the backend read fails. No
    /// fallback to an empty cart happens in that case, so a transient
    /// backend problem cannot silently wipe a saved cart.
    #[instrument(skip(storage))]
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self, CartStoreError> {
        let cart = match storage.get(keys::CART).await? {
            Some(raw) => match decode_record(&raw) {
                Ok(cart) => cart,
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cart record");
                    Cart::new()
                }
            },
            None => Cart::new(),
        };
        debug!(items = cart.len(), "Cart hydrated");
        Ok(Self::with_cart(storage, cart))
    }

    /// Snapshot of the line items in insertion order.
    pub async fn items(&self) -> Vec<LineItem> {
        self.inner.cart.lock().await.items().to_vec()
    }

    /// Sum of all quantities, i.e. what a cart badge displays.
    pub async fn total_quantity(&self) -> u64 {
        self.inner.cart.lock().await.total_quantity()
    }

    /// Whether the cart holds no items.
    pub async fn is_empty(&self) -> bool {
        self.inner.cart.lock().await.is_empty()
    }

    /// Add a product to the cart, or raise its quantity by 1 if an entry
    /// with the same ID is already there.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn add_or_increment(&self, item: NewLineItem) {
        let mut cart = self.inner.cart.lock().await;
        cart.add_or_increment(item);
        self.persist(&cart).await;
    }

    /// Raise the quantity of a product already in the cart by 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Cart`] if the product is not in the cart.
    /// Nothing is persisted in that case.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<(), CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        cart.increment(id)?;
        self.persist(&cart).await;
        Ok(())
    }

    /// Lower the quantity of a product already in the cart by 1, removing
    /// the entry entirely when its quantity is 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Cart`] if the product is not in the cart.
    /// Nothing is persisted in that case.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<(), CartStoreError> {
        let mut cart = self.inner.cart.lock().await;
        cart.decrement(id)?;
        self.persist(&cart).await;
        Ok(())
    }

    /// Write the current cart through to storage.
    ///
    /// Callers hold the cart lock, so records cannot reach the backend out
    /// of commit order. The in-memory state is already committed when this
    /// runs; a failed write is logged and the mutation stands.
    async fn persist(&self, cart: &Cart) {
        let record = match serde_json::to_string(cart) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart record");
                return;
            }
        };
        if let Err(e) = self.inner.storage.set(keys::CART, &record).await {
            warn!(error = %e, "Failed to persist cart record");
        }
    }
}

/// Decode a persisted cart record.
fn decode_record(raw: &str) -> Result<Cart, CartStoreError> {
    serde_json::from_str(raw).map_err(|e| CartStoreError::Corrupt(e.to_string()))
}
