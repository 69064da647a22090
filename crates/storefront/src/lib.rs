//! VitaBot storefront library.
//!
//! The chat widget, shopping cart and checkout flow of the VitaBot
//! supplement store. Browser surfaces (document, storage, navigation and
//! notifications) are traits so every handler runs without a browser.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod deferred;
pub mod document;
pub mod error;
pub mod page;
pub mod pricing;
pub mod render;
pub mod storage;
pub mod view;

pub use error::{Error, Result};
