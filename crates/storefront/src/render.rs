//! Thin renderer turning view models into page markup.
//!
//! Each function renders one Askama partial and writes it into a
//! [`Region`]. Regions missing from the page are skipped without rendering.

use askama::Template;
use thiserror::Error;

use crate::chat::ChatMessage;
use crate::document::{Document, Region};
use crate::view::{CartView, OrderLineView, OrderSummaryView, SummaryView};

/// Template rendering failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

/// Cart line list, or the empty state.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Totals box on the cart page.
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
pub struct CartSummaryTemplate<'a> {
    pub summary: &'a SummaryView,
}

/// Line list of the checkout order summary.
#[derive(Template)]
#[template(path = "partials/order_summary_items.html")]
pub struct OrderSummaryItemsTemplate<'a> {
    pub lines: &'a [OrderLineView],
}

/// Chat transcript.
#[derive(Template)]
#[template(path = "partials/chat_messages.html")]
pub struct ChatMessagesTemplate<'a> {
    pub messages: &'a [ChatMessage],
}

/// Label of the place-order button.
#[derive(Template)]
#[template(path = "partials/place_order_button.html")]
pub struct PlaceOrderButtonTemplate {
    pub processing: bool,
}

/// Update the count badge.
pub fn render_count(document: &mut dyn Document, count: u32) {
    document.set_text(Region::CartCount, &count.to_string());
}

/// Render the cart page: the line list, then the summary.
///
/// An empty cart shows the empty state and hides the summary.
///
/// # Errors
///
/// Returns `RenderError` if a template fails to render.
pub fn render_cart(document: &mut dyn Document, cart: &CartView) -> Result<(), RenderError> {
    if !document.contains(Region::CartItems) {
        return Ok(());
    }

    let items = CartItemsTemplate { cart }.render()?;
    document.set_html(Region::CartItems, &items);

    if cart.is_empty() {
        document.set_visible(Region::CartSummary, false);
    } else if document.contains(Region::CartSummary) {
        let summary = CartSummaryTemplate {
            summary: &cart.summary,
        }
        .render()?;
        document.set_html(Region::CartSummary, &summary);
        document.set_visible(Region::CartSummary, true);
    }
    Ok(())
}

/// Render the checkout order summary.
///
/// # Errors
///
/// Returns `RenderError` if a template fails to render.
pub fn render_order_summary(
    document: &mut dyn Document,
    order: &OrderSummaryView,
) -> Result<(), RenderError> {
    if !document.contains(Region::OrderSummaryItems) {
        return Ok(());
    }

    let lines = OrderSummaryItemsTemplate {
        lines: &order.lines,
    }
    .render()?;
    document.set_html(Region::OrderSummaryItems, &lines);
    document.set_text(Region::OrderSubtotal, &order.summary.subtotal);
    document.set_text(Region::OrderShipping, &order.summary.shipping);
    document.set_text(Region::OrderTotal, &order.summary.total);
    Ok(())
}

/// Re-render the chat transcript.
///
/// # Errors
///
/// Returns `RenderError` if the template fails to render.
pub fn render_chat(
    document: &mut dyn Document,
    messages: &[ChatMessage],
) -> Result<(), RenderError> {
    if !document.contains(Region::ChatMessages) {
        return Ok(());
    }
    let html = ChatMessagesTemplate { messages }.render()?;
    document.set_html(Region::ChatMessages, &html);
    Ok(())
}

/// Class set on the place-order button while an order is processing.
pub const LOADING_CLASS: &str = "loading";

/// Switch the place-order button between its idle and processing states.
///
/// While processing the button is disabled and carries the `loading` class.
///
/// # Errors
///
/// Returns `RenderError` if the template fails to render.
pub fn render_place_order_button(
    document: &mut dyn Document,
    processing: bool,
) -> Result<(), RenderError> {
    if !document.contains(Region::PlaceOrderButton) {
        return Ok(());
    }
    let html = PlaceOrderButtonTemplate { processing }.render()?;
    document.set_html(Region::PlaceOrderButton, html.trim());
    document.set_enabled(Region::PlaceOrderButton, !processing);
    document.toggle_class(Region::PlaceOrderButton, LOADING_CLASS, processing);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use vitabot_core::LineItem;

    use super::*;
    use crate::document::MemoryDocument;
    use crate::page::Page;
    use crate::pricing::Pricing;
    use crate::view::{compute_order_summary, compute_view};

    fn items() -> Vec<LineItem> {
        let mut sea_moss = LineItem::new(
            "sea-moss",
            "Organic Sea Moss",
            Decimal::new(24999, 2),
            "images/sea-moss.jpg",
        );
        sea_moss.quantity = 2;
        vec![sea_moss]
    }

    #[test]
    fn test_render_empty_cart() {
        let mut document = MemoryDocument::for_page(Page::Cart);
        render_cart(&mut document, &compute_view(&[], &Pricing::default())).unwrap();

        let html = document.content(Region::CartItems).unwrap();
        assert!(html.contains("Your cart is empty"));
        assert!(!html.contains("cart-header"));
        assert_eq!(document.is_visible(Region::CartSummary), Some(false));
    }

    #[test]
    fn test_render_cart_lines_and_summary() {
        let mut document = MemoryDocument::for_page(Page::Cart);
        render_cart(&mut document, &compute_view(&items(), &Pricing::default())).unwrap();

        let html = document.content(Region::CartItems).unwrap();
        assert!(html.contains("cart-header"));
        assert!(html.contains("<h4>Organic Sea Moss</h4>"));
        assert!(html.contains(r#"class="quantity-btn decrease" data-id="sea-moss""#));
        assert!(html.contains("R 499.98"));

        let summary = document.content(Region::CartSummary).unwrap();
        assert!(summary.contains("R 499.98"));
        assert!(summary.contains("R 49.99"));
        assert!(summary.contains("R 549.97"));
        assert!(summary.contains("checkout-btn"));
        assert_eq!(document.is_visible(Region::CartSummary), Some(true));
    }

    #[test]
    fn test_render_escapes_product_names() {
        let item = LineItem::new("x", "<script>alert(1)</script>", Decimal::ONE, "");
        let mut document = MemoryDocument::for_page(Page::Cart);
        render_cart(&mut document, &compute_view(&[item], &Pricing::default())).unwrap();

        let html = document.content(Region::CartItems).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_cart_skipped_off_cart_page() {
        let mut document = MemoryDocument::for_page(Page::Home);
        render_cart(&mut document, &compute_view(&items(), &Pricing::default())).unwrap();
        assert!(document.content(Region::CartItems).is_none());
    }

    #[test]
    fn test_render_order_summary() {
        let mut document = MemoryDocument::for_page(Page::Checkout);
        render_order_summary(
            &mut document,
            &compute_order_summary(&items(), &Pricing::default()),
        )
        .unwrap();

        let lines = document.content(Region::OrderSummaryItems).unwrap();
        assert!(lines.contains("Organic Sea Moss \u{d7} 2"));
        assert_eq!(document.content(Region::OrderSubtotal), Some("R 499.98"));
        assert_eq!(document.content(Region::OrderShipping), Some("R 49.99"));
        assert_eq!(document.content(Region::OrderTotal), Some("R 549.97"));
    }

    #[test]
    fn test_render_count() {
        let mut document = MemoryDocument::for_page(Page::Home);
        render_count(&mut document, 7);
        assert_eq!(document.content(Region::CartCount), Some("7"));
    }

    #[test]
    fn test_render_chat_transcript() {
        let mut document = MemoryDocument::for_page(Page::Home);
        let messages = [ChatMessage::user("hello"), ChatMessage::bot("Hi there")];
        render_chat(&mut document, &messages).unwrap();

        let html = document.content(Region::ChatMessages).unwrap();
        assert!(html.contains(r#"<div class="message user-message">hello</div>"#));
        assert!(html.contains(r#"<div class="message bot-message">Hi there</div>"#));
    }

    #[test]
    fn test_render_place_order_button() {
        let mut document = MemoryDocument::for_page(Page::Checkout);
        render_place_order_button(&mut document, true).unwrap();
        assert!(
            document
                .content(Region::PlaceOrderButton)
                .unwrap()
                .contains("Processing Order...")
        );
        assert_eq!(document.is_enabled(Region::PlaceOrderButton), Some(false));
        assert_eq!(
            document.has_class(Region::PlaceOrderButton, LOADING_CLASS),
            Some(true)
        );

        render_place_order_button(&mut document, false).unwrap();
        assert_eq!(
            document.content(Region::PlaceOrderButton),
            Some("Place Order")
        );
        assert_eq!(document.is_enabled(Region::PlaceOrderButton), Some(true));
        assert_eq!(
            document.has_class(Region::PlaceOrderButton, LOADING_CLASS),
            Some(false)
        );
    }
}
