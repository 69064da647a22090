//! The page markup the widgets render into.
//!
//! The markup itself belongs to the page; the widgets only know a fixed set
//! of [`Region`]s identified by their class selectors. A region that is not
//! on the current page is silently skipped.

use std::collections::{BTreeMap, BTreeSet};

use crate::page::Page;

/// A named element of the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Running item count in the header.
    CartCount,
    /// Line item list on the cart page.
    CartItems,
    /// Totals box on the cart page.
    CartSummary,
    /// Line list of the checkout order summary.
    OrderSummaryItems,
    OrderSubtotal,
    OrderShipping,
    OrderTotal,
    /// Submit button of the checkout form.
    PlaceOrderButton,
    /// The chat panel (shown while the chat is open).
    ChatPanel,
    /// Transcript container inside the chat panel.
    ChatMessages,
}

impl Region {
    /// CSS selector of the element in the page markup.
    #[must_use]
    pub const fn selector(&self) -> &'static str {
        match self {
            Self::CartCount => ".cart-count",
            Self::CartItems => ".cart-items",
            Self::CartSummary => ".cart-summary",
            Self::OrderSummaryItems => ".order-summary-items",
            Self::OrderSubtotal => ".order-subtotal",
            Self::OrderShipping => ".order-shipping",
            Self::OrderTotal => ".order-total",
            Self::PlaceOrderButton => ".place-order-btn",
            Self::ChatPanel => ".ai-chat",
            Self::ChatMessages => ".chat-messages",
        }
    }
}

/// Write access to the page markup.
pub trait Document {
    /// Whether `region` exists on the current page.
    fn contains(&self, region: Region) -> bool;

    /// Replace the inner markup of `region`.
    fn set_html(&mut self, region: Region, html: &str);

    /// Replace the text content of `region`.
    fn set_text(&mut self, region: Region, text: &str);

    /// Show or hide `region`.
    fn set_visible(&mut self, region: Region, visible: bool);

    /// Enable or disable a form control.
    fn set_enabled(&mut self, region: Region, enabled: bool);

    /// Add or remove a CSS class on `region`.
    fn toggle_class(&mut self, region: Region, class: &str, present: bool);
}

/// Rendered state of one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionState {
    pub content: String,
    pub visible: bool,
    pub enabled: bool,
    pub classes: BTreeSet<String>,
}

impl Default for RegionState {
    fn default() -> Self {
        Self {
            content: String::new(),
            visible: true,
            enabled: true,
            classes: BTreeSet::new(),
        }
    }
}

/// In-memory document holding the regions of one page.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    regions: BTreeMap<Region, RegionState>,
}

impl MemoryDocument {
    /// A document containing exactly `regions`.
    pub fn with_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|region| (region, RegionState::default()))
                .collect(),
        }
    }

    /// A document with the regions present on `page`.
    #[must_use]
    pub fn for_page(page: Page) -> Self {
        let mut regions = vec![Region::CartCount, Region::ChatPanel, Region::ChatMessages];
        match page {
            Page::Cart => regions.extend([Region::CartItems, Region::CartSummary]),
            Page::Checkout => regions.extend([
                Region::OrderSummaryItems,
                Region::OrderSubtotal,
                Region::OrderShipping,
                Region::OrderTotal,
                Region::PlaceOrderButton,
            ]),
            Page::Home | Page::Products => {}
        }
        let mut document = Self::with_regions(regions);
        // The chat panel starts closed.
        document.set_visible(Region::ChatPanel, false);
        document
    }

    /// Current content of `region`, if it exists.
    #[must_use]
    pub fn content(&self, region: Region) -> Option<&str> {
        self.regions
            .get(&region)
            .map(|state| state.content.as_str())
    }

    /// Current visibility of `region`, if it exists.
    #[must_use]
    pub fn is_visible(&self, region: Region) -> Option<bool> {
        self.regions.get(&region).map(|state| state.visible)
    }

    #[must_use]
    pub fn is_enabled(&self, region: Region) -> Option<bool> {
        self.regions.get(&region).map(|state| state.enabled)
    }

    #[must_use]
    pub fn has_class(&self, region: Region, class: &str) -> Option<bool> {
        self.regions
            .get(&region)
            .map(|state| state.classes.contains(class))
    }
}

impl Document for MemoryDocument {
    fn contains(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    fn set_html(&mut self, region: Region, html: &str) {
        if let Some(state) = self.regions.get_mut(&region) {
            html.clone_into(&mut state.content);
        }
    }

    fn set_text(&mut self, region: Region, text: &str) {
        if let Some(state) = self.regions.get_mut(&region) {
            text.clone_into(&mut state.content);
        }
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        if let Some(state) = self.regions.get_mut(&region) {
            state.visible = visible;
        }
    }

    fn set_enabled(&mut self, region: Region, enabled: bool) {
        if let Some(state) = self.regions.get_mut(&region) {
            state.enabled = enabled;
        }
    }

    fn toggle_class(&mut self, region: Region, class: &str, present: bool) {
        if let Some(state) = self.regions.get_mut(&region) {
            if present {
                state.classes.insert(class.to_owned());
            } else {
                state.classes.remove(class);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_to_absent_region_are_skipped() {
        let mut document = MemoryDocument::with_regions([Region::CartCount]);
        document.set_html(Region::CartItems, "<div></div>");
        document.set_text(Region::CartCount, "3");

        assert!(!document.contains(Region::CartItems));
        assert_eq!(document.content(Region::CartItems), None);
        assert_eq!(document.content(Region::CartCount), Some("3"));
    }

    #[test]
    fn test_page_regions() {
        let cart = MemoryDocument::for_page(Page::Cart);
        assert!(cart.contains(Region::CartItems));
        assert!(!cart.contains(Region::OrderTotal));

        let checkout = MemoryDocument::for_page(Page::Checkout);
        assert!(checkout.contains(Region::PlaceOrderButton));
        assert!(!checkout.contains(Region::CartSummary));

        let home = MemoryDocument::for_page(Page::Home);
        assert!(home.contains(Region::CartCount));
        assert_eq!(home.is_visible(Region::ChatPanel), Some(false));
    }

    #[test]
    fn test_enabled_and_classes() {
        let mut document = MemoryDocument::for_page(Page::Checkout);
        assert_eq!(document.is_enabled(Region::PlaceOrderButton), Some(true));

        document.set_enabled(Region::PlaceOrderButton, false);
        document.toggle_class(Region::PlaceOrderButton, "loading", true);
        assert_eq!(document.is_enabled(Region::PlaceOrderButton), Some(false));
        assert_eq!(
            document.has_class(Region::PlaceOrderButton, "loading"),
            Some(true)
        );

        document.toggle_class(Region::PlaceOrderButton, "loading", false);
        assert_eq!(
            document.has_class(Region::PlaceOrderButton, "loading"),
            Some(false)
        );
        assert_eq!(document.has_class(Region::CartItems, "loading"), None);
    }

    #[test]
    fn test_selectors() {
        assert_eq!(Region::CartCount.selector(), ".cart-count");
        assert_eq!(Region::ChatPanel.selector(), ".ai-chat");
    }
}
