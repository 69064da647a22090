//! Unified error type for the storefront library.
//!
//! Each concern has its own error enum; `Error` collects them so entry
//! points can use a single `Result` alias.

use thiserror::Error;

use crate::cart::CartError;
use crate::chat::{ChatError, ResponseTableError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::render::RenderError;
use crate::storage::StorageError;

/// Storefront-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Response table error: {0}")]
    ResponseTable(#[from] ResponseTableError),
}

impl Error {
    /// Whether the visitor has already been told about this failure through
    /// a notification.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Cart(
                CartError::Empty
                    | CartError::MissingId
                    | CartError::InvalidPrice(_)
                    | CartError::NegativePrice(_)
            ) | Self::Checkout(CheckoutError::Invalid(_))
        )
    }
}

/// Result type for storefront operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::ValidationErrors;

    #[test]
    fn test_user_facing_errors() {
        assert!(Error::from(CartError::Empty).is_user_facing());
        assert!(Error::from(CheckoutError::Invalid(ValidationErrors::default())).is_user_facing());
        assert!(!Error::from(StorageError::InvalidKey("../x".to_string())).is_user_facing());
    }

    #[test]
    fn test_display_prefixes_concern() {
        let err = Error::from(CartError::Empty);
        assert_eq!(err.to_string(), "Cart error: cart is empty");
    }
}
