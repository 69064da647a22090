//! Subcommand implementations.

pub mod cart;
pub mod chat;
pub mod checkout;
