//! Core types for Sweetcart.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart_item;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart_item::CartItemState;
pub use id::ItemId;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use product::{ProductEntry, ProductImages};
pub use status::{CartStatus, ItemPhase};
