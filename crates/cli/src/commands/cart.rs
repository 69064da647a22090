//! Cart commands.
//!
//! Each command loads the persisted cart, applies one handler against a
//! cart-page document and leaves the result in storage.

use tracing::info;
use vitabot_core::ProductId;
use vitabot_storefront::cart::QuantityChange;
use vitabot_storefront::config::StorefrontConfig;
use vitabot_storefront::document::MemoryDocument;
use vitabot_storefront::page::{Page, Ui};

use crate::console::{ConsoleNavigator, ConsoleNotifier, open_cart, print_cart};
use crate::error::CliError;

/// Add one unit of a product, as an add-to-cart button would.
pub fn add(
    config: &StorefrontConfig,
    id: &str,
    name: &str,
    price: &str,
    image: &str,
) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Products);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    let quantity = cart.add_from_attributes(&mut ui, id, name, price, image)?;
    info!(product_id = id, quantity, "Cart updated");
    Ok(())
}

pub fn increase(config: &StorefrontConfig, id: &str) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Cart);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    if cart.increase(&mut ui, &ProductId::new(id))?.is_none() {
        info!(product_id = id, "No such cart line");
    }
    print_cart(&cart.view());
    Ok(())
}

pub fn decrease(config: &StorefrontConfig, id: &str) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Cart);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    if cart.decrease(&mut ui, &ProductId::new(id))? == QuantityChange::NotFound {
        info!(product_id = id, "No such cart line");
    }
    print_cart(&cart.view());
    Ok(())
}

pub fn remove(config: &StorefrontConfig, id: &str) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Cart);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    cart.remove(&mut ui, &ProductId::new(id))?;
    print_cart(&cart.view());
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
pub fn show(config: &StorefrontConfig) -> Result<(), CliError> {
    print_cart(&open_cart(config).view());
    Ok(())
}

pub fn clear(config: &StorefrontConfig) -> Result<(), CliError> {
    let mut cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Cart);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    cart.clear(&mut ui)?;
    print_cart(&cart.view());
    Ok(())
}
