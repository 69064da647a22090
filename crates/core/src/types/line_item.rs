//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// One distinct product entry in the cart together with its quantity.
///
/// The JSON form is the persisted cart record:
/// `{"id": "...", "name": "...", "price": 249.99, "image": "...", "quantity": 1}`.
/// `price` is written as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product this line refers to. Unique within a cart.
    pub id: ProductId,
    /// Product name shown on the cart page.
    pub name: String,
    /// Unit price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL or path.
    #[serde(default)]
    pub image: String,
    /// Number of units, always at least 1 while the line exists.
    pub quantity: u32,
}

impl LineItem {
    /// Create a new line with a quantity of one.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            quantity: 1,
        }
    }

    /// Unit price multiplied by quantity, at full precision.
    ///
    /// Saturates at `Decimal::MAX` rather than overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// Sum of all quantities, as shown on the cart count badge.
#[must_use]
pub fn total_quantity(items: &[LineItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
}
