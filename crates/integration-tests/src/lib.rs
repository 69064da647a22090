//! Integration tests for the VitaBot storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitabot-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Adding, adjusting and rendering the persisted cart
//! - `checkout_flow` - Checkout navigation and order placement
//! - `chat_flow` - Chat replies, auto-open and custom response tables
//!
//! Every test gets its own storage directory, so carts persist across
//! "page loads" within a test and never between tests.

#![allow(clippy::missing_panics_doc)]

use tempfile::TempDir;
use vitabot_storefront::cart::{CartManager, CartStore};
use vitabot_storefront::config::StorefrontConfig;
use vitabot_storefront::document::MemoryDocument;
use vitabot_storefront::page::{Page, RecordingNavigator, RecordingNotifier, Ui};
use vitabot_storefront::storage::FileStorage;

/// A storefront backed by a throwaway storage directory.
pub struct TestStorefront {
    pub config: StorefrontConfig,
    _dir: TempDir,
}

impl TestStorefront {
    /// Default configuration with storage in a fresh temporary directory.
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Configuration read from `vars` as if they were environment variables.
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create storage directory");
        let storage_dir = dir.path().to_string_lossy().into_owned();
        let config = StorefrontConfig::from_lookup(|key| {
            if key == "VITABOT_STORAGE_DIR" {
                return Some(storage_dir.clone());
            }
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string())
        })
        .expect("Invalid test configuration");
        Self { config, _dir: dir }
    }

    /// Local storage as a fresh page load would see it.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.config.storage_dir.clone())
    }

    /// Load the persisted cart, as every page does on load.
    pub fn cart(&self) -> CartManager<FileStorage> {
        CartManager::new(
            CartStore::load_or_empty(self.storage()),
            self.config.pricing,
        )
    }
}

impl Default for TestStorefront {
    fn default() -> Self {
        Self::new()
    }
}

/// One open page: its document plus recorded navigation and notifications.
pub struct Browser {
    pub document: MemoryDocument,
    pub navigator: RecordingNavigator,
    pub notifier: RecordingNotifier,
}

impl Browser {
    pub fn open(page: Page) -> Self {
        Self {
            document: MemoryDocument::for_page(page),
            navigator: RecordingNavigator::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    /// Handler context for this page.
    pub fn ui(&mut self) -> Ui<'_> {
        Ui::new(&mut self.document, &mut self.navigator).with_notifier(&self.notifier)
    }

    /// Messages of every notification shown so far.
    pub fn notifications(&self) -> Vec<String> {
        self.notifier
            .received()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }
}
