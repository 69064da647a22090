//! Cart handlers: mutate the store, then refresh the page.

use tracing::{info, instrument, warn};
use vitabot_core::{LineItem, NotificationKind, ProductId};

use super::store::{CartError, CartStore, ProductListing, QuantityChange};
use crate::document::Document;
use crate::page::{Page, Ui};
use crate::pricing::{CartSummary, Pricing};
use crate::render::{self, RenderError};
use crate::storage::Storage;
use crate::view::{CartView, OrderSummaryView, compute_order_summary, compute_view};

/// Owns the cart store and the pricing used to display it.
#[derive(Debug)]
pub struct CartManager<S: Storage> {
    store: CartStore<S>,
    pricing: Pricing,
}

impl<S: Storage> CartManager<S> {
    pub const fn new(store: CartStore<S>, pricing: Pricing) -> Self {
        Self { store, pricing }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn into_store(self) -> CartStore<S> {
        self.store
    }

    /// View model of the current cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        compute_view(self.store.items(), &self.pricing)
    }

    /// View model of the checkout order summary.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummaryView {
        compute_order_summary(self.store.items(), &self.pricing)
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.pricing.summarize(self.store.items())
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.store.item_count()
    }

    /// Add one unit of `product` and tell the visitor.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the page could not be refreshed.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn add(&mut self, ui: &mut Ui<'_>, product: &ProductListing) -> Result<u32, CartError> {
        let quantity = self.store.add(product);
        self.refresh(&mut *ui.document)?;
        ui.notify(
            &format!("{} added to cart!", product.name),
            NotificationKind::Success,
        );
        Ok(quantity)
    }

    /// Add a product from raw button attributes.
    ///
    /// # Errors
    ///
    /// Returns the parse error after showing an error notification; the cart
    /// is left untouched. Also returns `CartError::Render` if the page could
    /// not be refreshed.
    pub fn add_from_attributes(
        &mut self,
        ui: &mut Ui<'_>,
        id: &str,
        name: &str,
        price: &str,
        image: &str,
    ) -> Result<u32, CartError> {
        let product = match ProductListing::from_attributes(id, name, price, image) {
            Ok(product) => product,
            Err(e) => {
                warn!(error = %e, "Rejected add-to-cart");
                ui.notify(
                    &format!("Could not add {name} to cart"),
                    NotificationKind::Error,
                );
                return Err(e);
            }
        };
        self.add(ui, &product)
    }

    /// Add one unit to an existing line and refresh the page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the page could not be refreshed.
    pub fn increase(&mut self, ui: &mut Ui<'_>, id: &ProductId) -> Result<Option<u32>, CartError> {
        let quantity = self.store.increase(id);
        self.refresh(&mut *ui.document)?;
        Ok(quantity)
    }

    /// Remove one unit from a line and refresh the page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the page could not be refreshed.
    pub fn decrease(
        &mut self,
        ui: &mut Ui<'_>,
        id: &ProductId,
    ) -> Result<QuantityChange, CartError> {
        let change = self.store.decrease(id);
        self.refresh(&mut *ui.document)?;
        Ok(change)
    }

    /// Delete a line and refresh the page.
    ///
    /// The visitor is notified only when a line was actually removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the page could not be refreshed.
    pub fn remove(
        &mut self,
        ui: &mut Ui<'_>,
        id: &ProductId,
    ) -> Result<Option<LineItem>, CartError> {
        let removed = self.store.remove(id);
        self.refresh(&mut *ui.document)?;
        if removed.is_some() {
            ui.notify("Item removed from cart", NotificationKind::Success);
        }
        Ok(removed)
    }

    /// Empty the cart and refresh the page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the page could not be refreshed.
    pub fn clear(&mut self, ui: &mut Ui<'_>) -> Result<(), CartError> {
        self.store.clear();
        self.refresh(&mut *ui.document)?;
        Ok(())
    }

    /// Re-render the count badge and, on the cart page, the cart.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if a template fails to render.
    pub fn refresh(&self, document: &mut dyn Document) -> Result<(), RenderError> {
        self.render_count(document);
        self.render_cart(document)
    }

    pub fn render_count(&self, document: &mut dyn Document) {
        render::render_count(document, self.item_count());
    }

    /// Render the cart page regions.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if a template fails to render.
    pub fn render_cart(&self, document: &mut dyn Document) -> Result<(), RenderError> {
        render::render_cart(document, &self.view())
    }

    /// Render the checkout order summary.
    ///
    /// An empty cart sends the visitor back to the cart page instead; the
    /// return value says whether the summary was rendered.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if a template fails to render.
    pub fn render_order_summary(&self, ui: &mut Ui<'_>) -> Result<bool, CartError> {
        if self.store.is_empty() {
            ui.navigate(Page::Cart);
            return Ok(false);
        }
        render::render_order_summary(&mut *ui.document, &self.order_summary())?;
        Ok(true)
    }

    /// Go to the checkout page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` after showing an error notification if
    /// there is nothing to check out. No navigation happens in that case.
    pub fn checkout(&self, ui: &mut Ui<'_>) -> Result<(), CartError> {
        if self.store.is_empty() {
            ui.notify("Your cart is empty!", NotificationKind::Error);
            return Err(CartError::Empty);
        }
        info!(item_count = self.item_count(), "Proceeding to checkout");
        ui.navigate(Page::Checkout);
        Ok(())
    }

    /// Initial render when `page` loads.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if a template fails to render.
    pub fn init(&self, ui: &mut Ui<'_>, page: Page) -> Result<(), CartError> {
        self.render_count(&mut *ui.document);
        match page {
            Page::Cart => self.render_cart(&mut *ui.document)?,
            Page::Checkout => {
                self.render_order_summary(ui)?;
            }
            Page::Home | Page::Products => {}
        }
        Ok(())
    }
}
