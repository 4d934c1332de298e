//! Cart line-item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One entry in the cart: a product together with how many of it the
/// shopper has picked.
///
/// Display fields (`title`, `image_url`, `price`) are frozen at first
/// insertion. Adding the same product again only raises the quantity; it
/// never rewrites what is already stored (see [`Cart::add_or_increment`]).
///
/// [`Cart::add_or_increment`]: crate::cart::Cart::add_or_increment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name shown in the cart UI.
    pub title: String,
    /// Reference to the product image (URL or asset path).
    pub image_url: String,
    /// Unit price. Currency handling is up to the embedding application.
    pub price: Decimal,
    /// How many of this product are in the cart. Always at least 1; a
    /// decrement that would reach 0 removes the entry instead.
    pub quantity: u32,
}

/// A product about to enter the cart.
///
/// Deliberately carries no quantity: a product always enters the cart with
/// quantity 1, and further adds of the same ID only increment the existing
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name shown in the cart UI.
    pub title: String,
    /// Reference to the product image (URL or asset path).
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
}

impl NewLineItem {
    /// Create a new cart input for a product.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Convert the input into a stored line item with the given quantity.
    #[must_use]
    pub fn into_line_item(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}
