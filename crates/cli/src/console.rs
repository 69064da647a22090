//! Terminal stand-ins for the browser surfaces.

#![allow(clippy::print_stdout)]

use vitabot_core::NotificationKind;
use vitabot_storefront::cart::{CartManager, CartStore};
use vitabot_storefront::config::StorefrontConfig;
use vitabot_storefront::page::{Navigator, Notifier, Page};
use vitabot_storefront::storage::FileStorage;
use vitabot_storefront::view::{CartView, OrderSummaryView};

/// Prints notifications as they are raised.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_notification(&self, message: &str, kind: NotificationKind) {
        println!("[{kind}] {message}");
    }
}

/// Records where the storefront would have navigated and says so.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    current: Option<Page>,
}

impl ConsoleNavigator {
    pub const fn current(&self) -> Option<Page> {
        self.current
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&mut self, page: Page) {
        println!("-> {}", page.path());
        self.current = Some(page);
    }
}

/// Open the persisted cart under the configured storage directory.
pub fn open_cart(config: &StorefrontConfig) -> CartManager<FileStorage> {
    let storage = FileStorage::new(config.storage_dir.clone());
    CartManager::new(CartStore::load_or_empty(storage), config.pricing)
}

pub fn print_cart(view: &CartView) {
    if view.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in &view.items {
        println!(
            "{:<24} {:>12} x {:<3} {:>12}   ({})",
            item.name, item.price, item.quantity, item.line_total, item.id
        );
    }
    println!();
    println!("Items:    {}", view.item_count);
    println!("Subtotal: {}", view.summary.subtotal);
    println!("Shipping: {}", view.summary.shipping);
    println!("Total:    {}", view.summary.total);
}

pub fn print_order_summary(order: &OrderSummaryView) {
    for line in &order.lines {
        println!("{:<32} {:>12}", line.label, line.total);
    }
    println!();
    println!("Subtotal: {}", order.summary.subtotal);
    println!("Shipping: {}", order.summary.shipping);
    println!("Total:    {}", order.summary.total);
}
