//! Navigation, notifications and the per-handler UI context.

use std::cell::RefCell;

use vitabot_core::NotificationKind;

use crate::document::Document;

/// Storefront pages the widgets know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Products,
    Cart,
    Checkout,
}

impl Page {
    /// Path of the page's document.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Home => "index.html",
            Self::Products => "products.html",
            Self::Cart => "cart.html",
            Self::Checkout => "checkout.html",
        }
    }

    /// Identify the page from a location path such as `/shop/cart.html`.
    ///
    /// Unknown paths map to [`Page::Home`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        [Self::Products, Self::Cart, Self::Checkout]
            .into_iter()
            .find(|page| path.contains(page.path()))
            .unwrap_or(Self::Home)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the browser to another page.
pub trait Navigator {
    fn navigate(&mut self, page: Page);
}

/// The page's optional `showNotification(message, kind)` hook.
pub trait Notifier {
    fn show_notification(&self, message: &str, kind: NotificationKind);
}

/// A notification as delivered to the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Notifier that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Notification> {
        self.received.borrow().clone()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.received.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn show_notification(&self, message: &str, kind: NotificationKind) {
        self.received.borrow_mut().push(Notification {
            message: message.to_owned(),
            kind,
        });
    }
}

/// Navigator that records where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Vec<Page>,
}

impl RecordingNavigator {
    /// Create a navigator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages navigated to, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Page] {
        &self.history
    }

    /// The page most recently navigated to.
    #[must_use]
    pub fn current(&self) -> Option<Page> {
        self.history.last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, page: Page) {
        self.history.push(page);
    }
}

/// Everything a handler may touch outside its own state.
pub struct Ui<'a> {
    pub document: &'a mut dyn Document,
    pub navigator: &'a mut dyn Navigator,
    pub notifier: Option<&'a dyn Notifier>,
}

impl<'a> Ui<'a> {
    /// A context without a notification hook.
    pub fn new(document: &'a mut dyn Document, navigator: &'a mut dyn Navigator) -> Self {
        Self {
            document,
            navigator,
            notifier: None,
        }
    }

    /// Attach the page's notification hook.
    #[must_use]
    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Show a notification if the page has a hook; otherwise do nothing.
    pub fn notify(&self, message: &str, kind: NotificationKind) {
        if let Some(notifier) = self.notifier {
            notifier.show_notification(message, kind);
        }
    }

    /// Navigate to `page`.
    pub fn navigate(&mut self, page: Page) {
        tracing::debug!(%page, "Navigating");
        self.navigator.navigate(page);
    }
}
