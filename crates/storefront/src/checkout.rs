//! Checkout form validation and the order-placement state machine.
//!
//! A submission moves through
//! `Idle -> Validating -> Invalid -> Idle` when the form is incomplete, or
//! `Idle -> Validating -> Processing -> Completed` when it is accepted.
//! Cancelling while processing returns to `Idle`.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use vitabot_core::{NotificationKind, PaymentMethod, Price};

use crate::cart::CartManager;
use crate::config::CheckoutTimings;
use crate::deferred::{CancelToken, Cancelled, delay};
use crate::page::{Page, Ui};
use crate::render::{RenderError, render_place_order_button};
use crate::storage::Storage;

pub const MISSING_PAYMENT_MESSAGE: &str = "Please select a payment method";
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully! Thank you for your purchase.";

/// One input of the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub required: bool,
    /// Set by validation when a required value is blank.
    pub has_error: bool,
}

impl FormField {
    pub fn required(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            required: true,
            has_error: false,
        }
    }

    pub fn optional(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, value)
        }
    }

    fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

/// What was wrong with a rejected form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("checkout form is incomplete")]
pub struct ValidationErrors {
    /// Names of required fields left blank, in form order.
    pub missing_fields: Vec<String>,
    pub missing_payment: bool,
}

/// The checkout form as submitted.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    fields: Vec<FormField>,
    payment_method: Option<PaymentMethod>,
}

impl CheckoutForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock checkout form: contact and delivery details.
    #[must_use]
    pub fn standard() -> Self {
        [
            "first_name",
            "last_name",
            "email",
            "phone",
            "address",
            "city",
            "postal_code",
            "country",
        ]
        .into_iter()
        .fold(Self::new(), |form, name| {
            form.with_field(FormField::required(name, ""))
        })
        .with_field(FormField::optional("notes", ""))
    }

    #[must_use]
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the value of `name`, adding an optional field if it is unknown.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value;
        } else {
            self.fields.push(FormField::optional(name, value));
        }
    }

    pub const fn select_payment(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every required field and the payment selection.
    ///
    /// Blank required fields get their error flag set; all others are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` describing everything that is missing.
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for field in &mut self.fields {
            field.has_error = field.is_missing();
            if field.has_error {
                errors.missing_fields.push(field.name.clone());
            }
        }
        errors.missing_payment = self.payment_method.is_none();

        if errors.missing_fields.is_empty() && !errors.missing_payment {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Where a checkout submission is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Processing,
    Completed,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Processing => "processing",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// An order is already being placed or has been placed.
    #[error("order already submitted ({0})")]
    AlreadySubmitted(CheckoutState),

    #[error("invalid checkout transition: {from} -> {to}")]
    InvalidTransition {
        from: CheckoutState,
        to: CheckoutState,
    },

    #[error("order placement cancelled")]
    Cancelled(#[from] Cancelled),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Validate that a checkout state transition is allowed.
///
/// Valid transitions:
/// - Idle -> Validating
/// - Validating -> Invalid
/// - Validating -> Processing
/// - Invalid -> Idle
/// - Processing -> Completed
/// - Processing -> Idle (cancelled)
///
/// # Errors
///
/// Returns `CheckoutError::InvalidTransition` for any other pair.
pub fn validate_transition(from: CheckoutState, to: CheckoutState) -> Result<(), CheckoutError> {
    let valid = matches!(
        (from, to),
        (CheckoutState::Idle, CheckoutState::Validating)
            | (CheckoutState::Validating, CheckoutState::Invalid)
            | (CheckoutState::Validating, CheckoutState::Processing)
            | (CheckoutState::Invalid, CheckoutState::Idle)
            | (CheckoutState::Processing, CheckoutState::Completed)
            | (CheckoutState::Processing, CheckoutState::Idle)
    );

    if valid {
        Ok(())
    } else {
        Err(CheckoutError::InvalidTransition { from, to })
    }
}

/// Receipt for a placed order. Logged, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_number: Uuid,
    pub placed_at: DateTime<Utc>,
    pub item_count: u32,
    pub total: Price,
}

/// Drives one checkout page's order submission.
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    state: CheckoutState,
    timings: CheckoutTimings,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new(timings: CheckoutTimings) -> Self {
        Self {
            state: CheckoutState::Idle,
            timings,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    fn transition(&mut self, to: CheckoutState) -> Result<(), CheckoutError> {
        validate_transition(self.state, to)?;
        debug!(from = %self.state, %to, "Checkout transition");
        self.state = to;
        Ok(())
    }

    /// Validate the form, simulate processing, then clear the cart and
    /// send the visitor home.
    ///
    /// Once processing finishes the order counts as placed: a failed page
    /// refresh is logged and a cancelled redirect is skipped.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::AlreadySubmitted` if an order is processing or done
    /// - `CheckoutError::Invalid` after the error notifications are shown
    /// - `CheckoutError::Cancelled` if processing was cancelled; the cart is
    ///   untouched and the button restored
    /// - `CheckoutError::Render` if the place-order button could not be updated
    #[instrument(skip_all, fields(state = %self.state))]
    pub async fn place_order<S: Storage>(
        &mut self,
        cart: &mut CartManager<S>,
        form: &mut CheckoutForm,
        ui: &mut Ui<'_>,
        token: &CancelToken,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if matches!(
            self.state,
            CheckoutState::Processing | CheckoutState::Completed
        ) {
            return Err(CheckoutError::AlreadySubmitted(self.state));
        }

        self.transition(CheckoutState::Validating)?;
        if let Err(errors) = form.validate() {
            self.transition(CheckoutState::Invalid)?;
            if errors.missing_payment {
                ui.notify(MISSING_PAYMENT_MESSAGE, NotificationKind::Error);
            }
            ui.notify(MISSING_FIELDS_MESSAGE, NotificationKind::Error);
            debug!(?errors, "Checkout form rejected");
            self.transition(CheckoutState::Idle)?;
            return Err(errors.into());
        }

        self.transition(CheckoutState::Processing)?;
        render_place_order_button(&mut *ui.document, true)?;

        if let Err(cancelled) = delay(self.timings.order_processing_delay, token).await {
            self.transition(CheckoutState::Idle)?;
            render_place_order_button(&mut *ui.document, false)?;
            info!("Order processing cancelled");
            return Err(cancelled.into());
        }

        let confirmation = OrderConfirmation {
            order_number: Uuid::new_v4(),
            placed_at: Utc::now(),
            item_count: cart.item_count(),
            total: cart.pricing().price(cart.summary().total),
        };

        self.transition(CheckoutState::Completed)?;
        if let Err(e) = cart.clear(ui) {
            warn!(error = %e, "Failed to refresh the page after the order was placed");
        }
        ui.notify(ORDER_PLACED_MESSAGE, NotificationKind::Success);
        info!(
            order_number = %confirmation.order_number,
            item_count = confirmation.item_count,
            total = %confirmation.total,
            payment = ?form.payment_method(),
            "Order placed"
        );

        if delay(self.timings.redirect_delay, token).await.is_ok() {
            ui.navigate(Page::Home);
        } else {
            debug!("Redirect after order cancelled");
        }

        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use tokio::time::Instant;

    use super::*;
    use crate::cart::{CartStore, ProductListing};
    use crate::document::{MemoryDocument, Region};
    use crate::page::{RecordingNavigator, RecordingNotifier};
    use crate::pricing::Pricing;
    use crate::render::LOADING_CLASS;
    use crate::storage::{MemoryStorage, keys};

    fn filled_form() -> CheckoutForm {
        let mut form = CheckoutForm::standard();
        for (name, value) in [
            ("first_name", "Thandi"),
            ("last_name", "Nkosi"),
            ("email", "thandi@example.com"),
            ("phone", "+27 82 555 0101"),
            ("address", "12 Long Street"),
            ("city", "Cape Town"),
            ("postal_code", "8001"),
            ("country", "South Africa"),
        ] {
            form.set(name, value);
        }
        form.select_payment(PaymentMethod::Card);
        form
    }

    fn cart_with_items() -> CartManager<MemoryStorage> {
        let mut store = CartStore::load_or_empty(MemoryStorage::new());
        let moringa =
            ProductListing::from_attributes("moringa", "Moringa Powder", "179.99", "").unwrap();
        let vitamin =
            ProductListing::from_attributes("vitamin", "Multi-Vitamin Complex", "279.99", "")
                .unwrap();
        store.add(&moringa);
        store.add(&moringa);
        store.add(&vitamin);
        CartManager::new(store, Pricing::default())
    }

    #[test]
    fn test_validate_marks_blank_required_fields() {
        let mut form = filled_form();
        form.set("city", "   ");
        form.set("notes", "");

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.missing_fields, vec!["city".to_string()]);
        assert!(!errors.missing_payment);
        assert!(form.field("city").unwrap().has_error);
        assert!(!form.field("notes").unwrap().has_error);

        form.set("city", "Cape Town");
        form.validate().unwrap();
        assert!(!form.field("city").unwrap().has_error);
    }

    #[test]
    fn test_validate_requires_payment() {
        let mut form = CheckoutForm::new().with_field(FormField::required("email", "a@b.co"));
        let errors = form.validate().unwrap_err();
        assert!(errors.missing_payment);
        assert!(errors.missing_fields.is_empty());
    }

    #[test]
    fn test_transitions() {
        use CheckoutState::{Completed, Idle, Invalid, Processing, Validating};

        assert!(validate_transition(Idle, Validating).is_ok());
        assert!(validate_transition(Validating, Invalid).is_ok());
        assert!(validate_transition(Validating, Processing).is_ok());
        assert!(validate_transition(Invalid, Idle).is_ok());
        assert!(validate_transition(Processing, Completed).is_ok());
        assert!(validate_transition(Processing, Idle).is_ok());

        assert!(validate_transition(Idle, Processing).is_err());
        assert!(validate_transition(Completed, Idle).is_err());
        assert!(validate_transition(Invalid, Processing).is_err());
        assert!(matches!(
            validate_transition(Completed, Validating),
            Err(CheckoutError::InvalidTransition {
                from: Completed,
                to: Validating
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_clears_cart_and_redirects() {
        let mut cart = cart_with_items();
        let mut form = filled_form();
        let mut flow = CheckoutFlow::default();
        let mut document = MemoryDocument::for_page(Page::Checkout);
        let mut navigator = RecordingNavigator::new();
        let notifier = RecordingNotifier::new();
        let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&notifier);
        let start = Instant::now();

        let confirmation = flow
            .place_order(&mut cart, &mut form, &mut ui, &CancelToken::new())
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(5000));
        assert_eq!(flow.state(), CheckoutState::Completed);
        assert_eq!(confirmation.item_count, 3);
        // 2 x 179.99 + 279.99 = 639.97, over the free shipping threshold
        assert_eq!(confirmation.total.amount, Decimal::new(63997, 2));
        assert_eq!(confirmation.order_number.get_version_num(), 4);

        assert!(cart.store().is_empty());
        assert_eq!(
            cart.store()
                .storage()
                .get_item(keys::CART)
                .unwrap()
                .as_deref(),
            Some("[]")
        );
        assert_eq!(notifier.last().unwrap().message, ORDER_PLACED_MESSAGE);
        assert_eq!(navigator.current(), Some(Page::Home));
        assert_eq!(document.content(Region::CartCount), Some("0"));
        assert!(
            document
                .content(Region::PlaceOrderButton)
                .unwrap()
                .contains("Processing Order...")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_returns_to_idle() {
        let mut cart = cart_with_items();
        let mut form = CheckoutForm::standard();
        let mut flow = CheckoutFlow::default();
        let mut document = MemoryDocument::for_page(Page::Checkout);
        let mut navigator = RecordingNavigator::new();
        let notifier = RecordingNotifier::new();
        let mut ui = Ui::new(&mut document, &mut navigator).with_notifier(&notifier);

        let err = flow
            .place_order(&mut cart, &mut form, &mut ui, &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Invalid(_)));
        assert_eq!(flow.state(), CheckoutState::Idle);
        let messages: Vec<_> = notifier.received().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, [MISSING_PAYMENT_MESSAGE, MISSING_FIELDS_MESSAGE]);
        assert!(form.field("email").unwrap().has_error);
        assert_eq!(cart.item_count(), 3);
        assert!(navigator.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_processing_restores_button() {
        let mut cart = cart_with_items();
        let mut form = filled_form();
        let mut flow = CheckoutFlow::default();
        let mut document = MemoryDocument::for_page(Page::Checkout);
        let mut navigator = RecordingNavigator::new();
        let mut ui = Ui::new(&mut document, &mut navigator);
        let token = CancelToken::new();
        token.cancel();

        let err = flow
            .place_order(&mut cart, &mut form, &mut ui, &token)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Cancelled(_)));
        assert_eq!(flow.state(), CheckoutState::Idle);
        assert_eq!(cart.item_count(), 3);
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

    #[tokio::test(start_paused = true)]
    async fn test_button_is_disabled_while_processing() {
        let mut cart = cart_with_items();
        let mut form = filled_form();
        let mut flow = CheckoutFlow::default();
        let mut document = MemoryDocument::for_page(Page::Checkout);
        let mut navigator = RecordingNavigator::new();
        let mut ui = Ui::new(&mut document, &mut navigator);
        let token = CancelToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            canceller.cancel();
        });
        let err = flow
            .place_order(&mut cart, &mut form, &mut ui, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Cancelled(_)));
        assert_eq!(document.is_enabled(Region::PlaceOrderButton), Some(true));

        let mut ui = Ui::new(&mut document, &mut navigator);
        flow.place_order(&mut cart, &mut form, &mut ui, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(document.is_enabled(Region::PlaceOrderButton), Some(false));
        assert_eq!(
            document.has_class(Region::PlaceOrderButton, LOADING_CLASS),
            Some(true)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_completes_when_redirect_is_cancelled() {
        let mut cart = cart_with_items();
        let mut form = filled_form();
        let mut flow = CheckoutFlow::default();
        let mut document = MemoryDocument::for_page(Page::Checkout);
        let mut navigator = RecordingNavigator::new();
        let mut ui = Ui::new(&mut document, &mut navigator);
        let token = CancelToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            canceller.cancel();
        });
        let confirmation = flow
            .place_order(&mut cart, &mut form, &mut ui, &token)
            .await
            .unwrap();

        assert_eq!(confirmation.item_count, 3);
        assert_eq!(flow.state(), CheckoutState::Completed);
        assert!(cart.store().is_empty());
        assert!(navigator.history().is_empty());

        let mut ui = Ui::new(&mut document, &mut navigator);
        let err = flow
            .place_order(&mut cart, &mut form, &mut ui, &CancelToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::AlreadySubmitted(CheckoutState::Completed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_flow_rejects_resubmission() {
        let mut cart = cart_with_items();
        let mut form = filled_form();
        let mut flow = CheckoutFlow::default();
        let mut document = MemoryDocument::for_page(Page::Checkout);
        let mut navigator = RecordingNavigator::new();
        let mut ui = Ui::new(&mut document, &mut navigator);

        flow.place_order(&mut cart, &mut form, &mut ui, &CancelToken::new())
            .await
            .unwrap();
        let err = flow
            .place_order(&mut cart, &mut form, &mut ui, &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::AlreadySubmitted(CheckoutState::Completed)
        ));
    }
}
