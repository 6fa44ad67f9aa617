//! Sweetcart Core - Shared types library.
//!
//! This crate provides the types shared by the Sweetcart components:
//! - `storefront` - Catalog loader, cart state machine, and surface sync
//! - `integration-tests` - End-to-end cart session scenarios
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Item IDs, prices, catalog products, and cart item state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
