//! Core types for VitaBot.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod line_item;
pub mod price;
pub mod status;

pub use id::ProductId;
pub use line_item::{LineItem, total_quantity};
pub use price::{CurrencyCode, CurrencyError, Price};
pub use status::*;
