//! Shopping cart: the persisted store and the manager that renders it.

pub mod manager;
pub mod store;

pub use manager::CartManager;
pub use store::{CartError, CartStore, MAX_UNIT_PRICE, ProductListing, QuantityChange};
