//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VITABOT_STORAGE_DIR` - Directory for persisted values (default: .vitabot)
//! - `VITABOT_CURRENCY` - Display currency: ZAR, NAD or BWP (default: ZAR)
//! - `VITABOT_FREE_SHIPPING_THRESHOLD` - Subtotals above this ship free (default: 500)
//! - `VITABOT_SHIPPING_FEE` - Flat shipping fee (default: 49.99)
//! - `VITABOT_REPLY_DELAY_MS` - Chat "thinking" delay (default: 1000)
//! - `VITABOT_AUTO_OPEN_DELAY_MS` - Delay before auto-opening chat on product pages (default: 10000)
//! - `VITABOT_GREETING_DELAY_MS` - Delay before the auto-open greeting (default: 500)
//! - `VITABOT_ORDER_DELAY_MS` - Simulated order processing time (default: 3000)
//! - `VITABOT_REDIRECT_DELAY_MS` - Delay before redirecting after an order (default: 2000)
//! - `VITABOT_RESPONSES_PATH` - JSON file replacing the stock chat responses
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::chat::{ResponseTable, ResponseTableError, Responder};
use crate::pricing::{Pricing, ShippingPolicy};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Delays used by the chat widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimings {
    /// Pause before the bot answers a message.
    pub reply_delay: Duration,
    /// Time on the products page before the chat opens by itself.
    pub auto_open_delay: Duration,
    /// Pause between auto-opening and posting the greeting.
    pub greeting_delay: Duration,
}

impl Default for ChatTimings {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(1000),
            auto_open_delay: Duration::from_millis(10_000),
            greeting_delay: Duration::from_millis(500),
        }
    }
}

/// Delays used by the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTimings {
    /// Simulated order processing time.
    pub order_processing_delay: Duration,
    /// Pause after the success notification before leaving the page.
    pub redirect_delay: Duration,
}

impl Default for CheckoutTimings {
    fn default() -> Self {
        Self {
            order_processing_delay: Duration::from_millis(3000),
            redirect_delay: Duration::from_millis(2000),
        }
    }
}

/// Storefront widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory backing the persistent store
    pub storage_dir: PathBuf,
    /// Shipping policy and display currency
    pub pricing: Pricing,
    /// Chat widget delays
    pub chat: ChatTimings,
    /// Checkout flow delays
    pub checkout: CheckoutTimings,
    /// Custom chat response table, if any
    pub responses_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".vitabot"),
            pricing: Pricing::default(),
            chat: ChatTimings::default(),
            checkout: CheckoutTimings::default(),
            responses_path: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let env = Env(&lookup);

        let currency = env.parsed("VITABOT_CURRENCY", defaults.pricing.currency)?;
        let shipping = ShippingPolicy {
            free_threshold: env.amount(
                "VITABOT_FREE_SHIPPING_THRESHOLD",
                defaults.pricing.shipping.free_threshold,
            )?,
            flat_fee: env.amount("VITABOT_SHIPPING_FEE", defaults.pricing.shipping.flat_fee)?,
        };

        let chat = ChatTimings {
            reply_delay: env.millis("VITABOT_REPLY_DELAY_MS", defaults.chat.reply_delay)?,
            auto_open_delay: env.millis(
                "VITABOT_AUTO_OPEN_DELAY_MS",
                defaults.chat.auto_open_delay,
            )?,
            greeting_delay: env.millis("VITABOT_GREETING_DELAY_MS", defaults.chat.greeting_delay)?,
        };
        let checkout = CheckoutTimings {
            order_processing_delay: env.millis(
                "VITABOT_ORDER_DELAY_MS",
                defaults.checkout.order_processing_delay,
            )?,
            redirect_delay: env.millis(
                "VITABOT_REDIRECT_DELAY_MS",
                defaults.checkout.redirect_delay,
            )?,
        };

        Ok(Self {
            storage_dir: env
                .optional("VITABOT_STORAGE_DIR")
                .map_or(defaults.storage_dir, PathBuf::from),
            pricing: Pricing { shipping, currency },
            chat,
            checkout,
            responses_path: env.optional("VITABOT_RESPONSES_PATH").map(PathBuf::from),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Build the chat responder, loading the custom table if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `ResponseTableError` if the configured table cannot be loaded.
    pub fn responder(&self) -> Result<Responder, ResponseTableError> {
        let table = match &self.responses_path {
            Some(path) => ResponseTable::load(path)?,
            None => ResponseTable::vitabot(),
        };
        Ok(Responder::new(table))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable with `FromStr`, falling back to `default`.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a non-negative decimal amount.
    fn amount(&self, key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
        let amount: Decimal = self.parsed(key, default)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
        Ok(amount)
    }

    /// Parse a millisecond count into a `Duration`.
    fn millis(&self, key: &str, default: Duration) -> Result<Duration, ConfigError> {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
