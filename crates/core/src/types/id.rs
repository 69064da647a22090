//! Newtype IDs for type-safe entity references.
//!
//! Product ids come straight from the page markup (`data-id` attributes), so
//! they are opaque strings rather than database integers.

use core::fmt;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Identifier of a product in the catalog.
///
/// Two line items with the same `ProductId` are the same cart entry.
///
/// ```
/// use vitabot_core::ProductId;
///
/// let id = ProductId::new("sea-moss");
/// assert_eq!(id.as_str(), "sea-moss");
/// assert_eq!(id, ProductId::from("sea-moss"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
