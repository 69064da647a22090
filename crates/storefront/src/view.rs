//! View models for the cart page, checkout summary and count badge.
//!
//! Everything here is a pure function of the cart contents. The renderer
//! turns these structs into markup; nothing in this module touches a
//! document.

use vitabot_core::{LineItem, total_quantity};

use crate::pricing::{CartSummary, Pricing};

/// Label shown instead of an amount when shipping is free.
pub const FREE_SHIPPING_LABEL: &str = "FREE";

/// Cart item display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Formatted cart totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub free_shipping: bool,
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
    pub item_count: u32,
}

impl CartView {
    /// Whether the cart page should show its empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One `name × quantity` row of the checkout order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineView {
    pub label: String,
    pub total: String,
}

/// Checkout order summary display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummaryView {
    pub lines: Vec<OrderLineView>,
    pub summary: SummaryView,
}

/// Build the cart page view for `items`.
#[must_use]
pub fn compute_view(items: &[LineItem], pricing: &Pricing) -> CartView {
    CartView {
        items: items
            .iter()
            .map(|item| CartItemView {
                id: item.id.to_string(),
                name: item.name.clone(),
                image: item.image.clone(),
                price: pricing.price(item.price).display(),
                quantity: item.quantity,
                line_total: pricing.price(item.line_total()).display(),
            })
            .collect(),
        summary: summary_view(&pricing.summarize(items), pricing),
        item_count: total_quantity(items),
    }
}

/// Build the checkout order summary for `items`.
#[must_use]
pub fn compute_order_summary(items: &[LineItem], pricing: &Pricing) -> OrderSummaryView {
    OrderSummaryView {
        lines: items
            .iter()
            .map(|item| OrderLineView {
                label: format!("{} \u{d7} {}", item.name, item.quantity),
                total: pricing.price(item.line_total()).display(),
            })
            .collect(),
        summary: summary_view(&pricing.summarize(items), pricing),
    }
}

fn summary_view(summary: &CartSummary, pricing: &Pricing) -> SummaryView {
    SummaryView {
        subtotal: pricing.price(summary.subtotal).display(),
        shipping: if summary.is_free_shipping() {
            FREE_SHIPPING_LABEL.to_string()
        } else {
            pricing.price(summary.shipping).display()
        },
        total: pricing.price(summary.total).display(),
        free_shipping: summary.is_free_shipping(),
    }
}
