//! VitaBot Core - Shared domain types.
//!
//! This crate provides the types shared by the VitaBot components:
//! - `storefront` - Cart manager, chat widget and checkout flow
//! - `cli` - Command-line front-end driving the widgets
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, cart line items and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
