//! CLI error type.

use thiserror::Error;

/// Errors that can end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] vitabot_storefront::Error),

    /// A `--field` argument without `=`.
    #[error("Invalid form field {0:?}, expected NAME=VALUE")]
    InvalidField(String),

    #[error("{0}")]
    InvalidPayment(String),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Whether a notification already explained the failure.
    pub const fn is_user_facing(&self) -> bool {
        match self {
            Self::Storefront(e) => e.is_user_facing(),
            Self::InvalidField(_) | Self::InvalidPayment(_) | Self::Io(_) => false,
        }
    }
}

/// Route each storefront concern error through `vitabot_storefront::Error`.
macro_rules! from_storefront {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for CliError {
                fn from(e: $error) -> Self {
                    Self::Storefront(e.into())
                }
            }
        )*
    };
}

from_storefront!(
    vitabot_storefront::cart::CartError,
    vitabot_storefront::chat::ChatError,
    vitabot_storefront::chat::ResponseTableError,
    vitabot_storefront::checkout::CheckoutError,
    vitabot_storefront::render::RenderError,
);
