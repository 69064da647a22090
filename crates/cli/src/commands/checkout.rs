//! Checkout commands.

#![allow(clippy::print_stdout)]

use tokio::signal;
use tracing::warn;
use vitabot_core::PaymentMethod;
use vitabot_storefront::checkout::{CheckoutFlow, CheckoutForm};
use vitabot_storefront::config::StorefrontConfig;
use vitabot_storefront::deferred::CancelToken;
use vitabot_storefront::document::MemoryDocument;
use vitabot_storefront::page::{Page, Ui};

use crate::console::{ConsoleNavigator, ConsoleNotifier, open_cart, print_order_summary};
use crate::error::CliError;

/// Press the checkout button on the cart page and show the order summary.
pub fn proceed(config: &StorefrontConfig) -> Result<(), CliError> {
    let cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Cart);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    cart.checkout(&mut ui)?;

    if navigator.current() == Some(Page::Checkout) {
        print_order_summary(&cart.order_summary());
    }
    Ok(())
}

/// Submit the checkout form built from `NAME=VALUE` pairs.
pub async fn place_order(
    config: &StorefrontConfig,
    fields: &[String],
    payment: Option<&str>,
) -> Result<(), CliError> {
    let mut form = CheckoutForm::standard();
    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| CliError::InvalidField(field.clone()))?;
        form.set(name.trim(), value);
    }
    if let Some(payment) = payment {
        let method: PaymentMethod = payment.parse().map_err(CliError::InvalidPayment)?;
        form.select_payment(method);
    }

    let mut cart = open_cart(config);
    let mut document = MemoryDocument::for_page(Page::Checkout);
    let mut navigator = ConsoleNavigator::default();
    let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&ConsoleNotifier);

    if !cart.render_order_summary(&mut ui)? {
        return Ok(());
    }
    print_order_summary(&cart.order_summary());
    println!("Processing order...");

    let token = CancelToken::new();
    let on_interrupt = token.clone();
    let interrupt = tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        } else {
            warn!("Failed to listen for Ctrl-C");
        }
    });

    let mut flow = CheckoutFlow::new(config.checkout);
    let result = flow
        .place_order(&mut cart, &mut form, &mut ui, &token)
        .await;
    interrupt.abort();

    let confirmation = result?;
    println!(
        "Order {} placed at {}: {} item(s), {}",
        confirmation.order_number,
        confirmation.placed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        confirmation.item_count,
        confirmation.total
    );
    Ok(())
}
