//! The cart: an ordered, ID-unique list of line items.
//!
//! All state transitions live here as pure methods on [`Cart`]; persistence
//! and concurrency live in the `pocketcart-store` crate. Every transition
//! preserves two invariants:
//!
//! - no two entries share a product ID;
//! - every entry has `quantity >= 1` (a decrement that would reach 0 removes
//!   the entry instead).
//!
//! The cart serializes as a bare JSON array of line items, which is also the
//! persisted record format. Deserialization re-validates the invariants, so a
//! record that parses is always a well-formed cart.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{LineItem, NewLineItem, ProductId};

/// Quantity a product enters the cart with on first insertion.
const FIRST_QUANTITY: u32 = 1;

/// Errors from cart transitions and cart-data validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The targeted product is not in the cart.
    #[error("product {id} is not in the cart")]
    NotFound {
        /// ID the caller asked for.
        id: ProductId,
    },
    /// Hydrated cart data contained the same product ID twice.
    #[error("duplicate product {id} in cart data")]
    DuplicateId {
        /// ID that appeared more than once.
        id: ProductId,
    },
    /// Hydrated cart data contained an entry with quantity 0.
    #[error("product {id} has quantity 0")]
    ZeroQuantity {
        /// ID of the offending entry.
        id: ProductId,
    },
}

/// An ordered sequence of line items, unique by product ID.
///
/// This is the pure in-memory state. Mutations take `&mut self` and return
/// typed errors; they never panic and never leave the cart half-updated.
///
/// ## Examples
///
/// ```
/// use pocketcart_core::{Cart, NewLineItem};
/// use rust_decimal::Decimal;
///
/// let mut cart = Cart::new();
/// cart.add_or_increment(NewLineItem::new("sku-1", "Cup", "cup.png", Decimal::new(500, 2)));
/// cart.add_or_increment(NewLineItem::new("sku-1", "Cup", "cup.png", Decimal::new(500, 2)));
///
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.total_quantity(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from already-stored line items, re-checking the cart
    /// invariants.
    ///
    /// This is the hydration path for persisted records. Callers treat a
    /// validation failure the same as unparseable data.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateId`] if two items share a product ID,
    /// or [`CartError::ZeroQuantity`] if an item has quantity 0.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity {
                    id: item.id.clone(),
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CartError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities, i.e. what a cart badge displays.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Look up a line item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add a product to the cart, or raise its quantity by 1 if an entry
    /// with the same ID already exists.
    ///
    /// The existing entry wins: its title, image and price stay as they were
    /// first stored, and only the quantity changes. A product not yet in the
    /// cart enters with quantity 1, appended at the end.
    pub fn add_or_increment(&mut self, item: NewLineItem) {
        if let Some(existing) = self.items.iter_mut().find(|existing| existing.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return;
        }
        self.items.push(item.into_line_item(FIRST_QUANTITY));
    }

    /// Raise the quantity of a product already in the cart by 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if no entry has this ID. The cart is
    /// left untouched.
    pub fn increment(&mut self, id: &ProductId) -> Result<(), CartError> {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return Err(CartError::NotFound { id: id.clone() });
        };
        item.quantity = item.quantity.saturating_add(1);
        Ok(())
    }

    /// Lower the quantity of a product already in the cart by 1, removing
    /// the entry entirely when its quantity is 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if no entry has this ID. The cart is
    /// left untouched.
    pub fn decrement(&mut self, id: &ProductId) -> Result<(), CartError> {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return Err(CartError::NotFound { id: id.clone() });
        };
        if item.quantity > 1 {
            item.quantity -= 1;
            return Ok(());
        }
        self.items.retain(|other| &other.id != id);
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}
