//! Cart state owned by an explicit store.
//!
//! [`CartStore`] owns the ordered list of line items together with the
//! storage it is persisted to. Every mutation rewrites the whole list under
//! [`keys::CART`]; there are no partial updates.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};
use vitabot_core::{LineItem, ProductId, total_quantity};

use crate::render::RenderError;
use crate::storage::{Storage, StorageError, keys};

/// Errors that can occur when loading or mutating the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The persisted cart could not be parsed.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A product button carried no id.
    #[error("product id cannot be empty")]
    MissingId,

    /// A product button carried a price that is not a number.
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    /// A product button carried a negative price.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),

    /// A product button carried a price above [`MAX_UNIT_PRICE`].
    #[error("price is too high: {0}")]
    PriceTooHigh(Decimal),

    /// Checkout was requested with nothing in the cart.
    #[error("cart is empty")]
    Empty,

    /// The cart page could not be re-rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Highest unit price a product button may carry.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// A product as advertised by an add-to-cart button.
///
/// Built from the button's `data-id`, `data-name` and `data-price`
/// attributes plus the product card's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

impl ProductListing {
    /// Parse a listing from raw button attributes.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingId` for a blank id, `CartError::InvalidPrice`
    /// if the price is not a decimal number, `CartError::NegativePrice` if it
    /// is below zero and `CartError::PriceTooHigh` above [`MAX_UNIT_PRICE`].
    pub fn from_attributes(
        id: &str,
        name: &str,
        price: &str,
        image: &str,
    ) -> Result<Self, CartError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CartError::MissingId);
        }

        let price = Decimal::from_str(price.trim())
            .map_err(|_| CartError::InvalidPrice(price.to_owned()))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(CartError::NegativePrice(price));
        }
        if price > MAX_UNIT_PRICE {
            return Err(CartError::PriceTooHigh(price));
        }

        Ok(Self {
            id: ProductId::new(id),
            name: name.trim().to_owned(),
            price,
            image: image.to_owned(),
        })
    }
}

/// Result of decrementing a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line still exists with the given quantity.
    Changed(u32),
    /// The quantity would have reached zero, so the line was removed.
    Removed,
    /// No line with that id exists.
    NotFound,
}

/// The cart's line items and the storage they are persisted to.
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    items: Vec<LineItem>,
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Load the cart from `storage`.
    ///
    /// A missing key yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Corrupt` if the stored value is not a JSON array of
    /// line items, or `CartError::Storage` if the backend cannot be read.
    pub fn load(storage: S) -> Result<Self, CartError> {
        let items = read_items(&storage)?;
        Ok(Self { items, storage })
    }

    /// Load the cart, starting empty if the stored value is unreadable.
    ///
    /// The unreadable value stays in storage until the next mutation
    /// overwrites it.
    pub fn load_or_empty(storage: S) -> Self {
        let items = read_items(&storage).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable cart");
            Vec::new()
        });
        Self { items, storage }
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities, as shown on the count badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        total_quantity(&self.items)
    }

    /// Add one unit of `product`, creating the line if needed.
    ///
    /// Returns the line's new quantity.
    pub fn add(&mut self, product: &ProductListing) -> u32 {
        let quantity = if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            item.quantity
        } else {
            self.items.push(LineItem::new(
                product.id.clone(),
                product.name.clone(),
                product.price,
                product.image.clone(),
            ));
            1
        };

        info!(product_id = %product.id, quantity, "Added to cart");
        self.persist();
        quantity
    }

    /// Add one unit to an existing line.
    ///
    /// Returns the new quantity, or `None` if no such line exists.
    pub fn increase(&mut self, id: &ProductId) -> Option<u32> {
        let quantity = self.items.iter_mut().find(|i| &i.id == id).map(|item| {
            item.quantity = item.quantity.saturating_add(1);
            item.quantity
        });
        self.persist();
        quantity
    }

    /// Remove one unit from a line, dropping the line when it would reach zero.
    pub fn decrease(&mut self, id: &ProductId) -> QuantityChange {
        let change = match self.items.iter().position(|i| &i.id == id) {
            None => QuantityChange::NotFound,
            Some(index) => {
                let remaining = self
                    .items
                    .get(index)
                    .map_or(0, |item| item.quantity.saturating_sub(1));
                if remaining == 0 {
                    self.items.remove(index);
                    QuantityChange::Removed
                } else {
                    if let Some(item) = self.items.get_mut(index) {
                        item.quantity = remaining;
                    }
                    QuantityChange::Changed(remaining)
                }
            }
        };
        debug!(product_id = %id, ?change, "Decreased cart line");
        self.persist();
        change
    }

    /// Delete a line. Returns the removed line, if there was one.
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let removed = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .map(|index| self.items.remove(index));
        if removed.is_some() {
            info!(product_id = %id, "Removed from cart");
        }
        self.persist();
        removed
    }

    /// Remove every line and persist the empty cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and hand back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Write the whole cart to storage. Failures are logged, not returned.
    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(keys::CART, &json) {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

fn read_items<S: Storage>(storage: &S) -> Result<Vec<LineItem>, CartError> {
    match storage.get_item(keys::CART)? {
        Some(json) => serde_json::from_str(&json).map_err(CartError::Corrupt),
        None => Ok(Vec::new()),
    }
}
