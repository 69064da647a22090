//! Cart totals.
//!
//! All arithmetic is done on `Decimal` at full precision. Rounding happens in
//! the view layer when amounts are formatted.

use rust_decimal::Decimal;
use vitabot_core::{CurrencyCode, LineItem, Price};

/// Shipping policy and display currency used to price a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pricing {
    pub shipping: ShippingPolicy,
    pub currency: CurrencyCode,
}

impl Pricing {
    /// Wrap an amount in the display currency.
    #[must_use]
    pub const fn price(&self, amount: Decimal) -> Price {
        Price::new(amount, self.currency)
    }

    /// Summarize `items` under this pricing.
    #[must_use]
    pub fn summarize(&self, items: &[LineItem]) -> CartSummary {
        CartSummary::compute(items, &self.shipping)
    }
}

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_threshold: Decimal,
    /// Fee charged at or below the threshold.
    pub flat_fee: Decimal,
}

impl ShippingPolicy {
    /// Shipping charged for a given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    /// R 49.99 shipping, free above R 500.
    fn default() -> Self {
        Self {
            free_threshold: Decimal::new(500, 0),
            flat_fee: Decimal::new(4999, 2),
        }
    }
}

/// Subtotal, shipping and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl CartSummary {
    /// Compute the summary for `items` under `policy`.
    ///
    /// Sums saturate at `Decimal::MAX` rather than overflowing.
    #[must_use]
    pub fn compute(items: &[LineItem], policy: &ShippingPolicy) -> Self {
        let subtotal = items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, saturating_add);
        let shipping = policy.shipping_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: saturating_add(subtotal, shipping),
        }
    }

    /// Whether shipping is free for this cart.
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: Decimal, quantity: u32) -> LineItem {
        let mut item = LineItem::new(id, id, price, "");
        item.quantity = quantity;
        item
    }

    fn summary_for(subtotal: Decimal) -> CartSummary {
        CartSummary::compute(&[item("x", subtotal, 1)], &ShippingPolicy::default())
    }

    #[test]
    fn test_subtotal_below_threshold_pays_shipping() {
        let summary = summary_for(Decimal::new(400, 0));
        assert_eq!(summary.shipping, Decimal::new(4999, 2));
        assert_eq!(summary.total, Decimal::new(44999, 2));
        assert!(!summary.is_free_shipping());
    }

    #[test]
    fn test_subtotal_above_threshold_ships_free() {
        let summary = summary_for(Decimal::new(600, 0));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::new(600, 0));
        assert!(summary.is_free_shipping());
    }

    #[test]
    fn test_threshold_is_strictly_greater_than() {
        let summary = summary_for(Decimal::new(500, 0));
        assert_eq!(summary.shipping, Decimal::new(4999, 2));
        assert_eq!(summary.total, Decimal::new(54999, 2));

        let summary = summary_for(Decimal::new(50001, 2));
        assert!(summary.is_free_shipping());
    }

    #[test]
    fn test_subtotal_sums_price_times_quantity() {
        let items = [
            item("sea-moss", Decimal::new(24999, 2), 2),
            item("charcoal", Decimal::new(15999, 2), 1),
        ];
        let summary = CartSummary::compute(&items, &ShippingPolicy::default());
        assert_eq!(summary.subtotal, Decimal::new(65997, 2));
        assert!(summary.is_free_shipping());
    }

    #[test]
    fn test_full_precision_is_kept() {
        let items = [item("a", Decimal::new(3333, 4), 3)];
        let summary = CartSummary::compute(&items, &ShippingPolicy::default());
        assert_eq!(summary.subtotal, Decimal::new(9999, 4));
    }

    #[test]
    fn test_empty_cart_still_quotes_shipping() {
        let summary = CartSummary::compute(&[], &ShippingPolicy::default());
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::new(4999, 2));
    }

    #[test]
    fn test_oversized_amounts_saturate() {
        let items = [item("a", Decimal::MAX, 2), item("b", Decimal::MAX, 1)];
        let summary = CartSummary::compute(&items, &ShippingPolicy::default());
        assert_eq!(summary.subtotal, Decimal::MAX);
        assert_eq!(summary.total, Decimal::MAX);
        assert!(summary.is_free_shipping());
    }

    #[test]
    fn test_custom_policy() {
        let policy = ShippingPolicy {
            free_threshold: Decimal::new(1000, 0),
            flat_fee: Decimal::new(75, 0),
        };
        let summary = CartSummary::compute(&[item("a", Decimal::new(600, 0), 1)], &policy);
        assert_eq!(summary.total, Decimal::new(675, 0));
    }
}
