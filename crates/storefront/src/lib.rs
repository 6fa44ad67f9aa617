//! Sweetcart storefront library.
//!
//! A product catalog and shopping-cart widget: product cards rendered from a
//! fetched catalog, a cart ledger driven by click actions, persistence of the
//! cart across page loads, and a page surface kept in step with the ledger.
//!
//! The pipeline for every click is
//! [`dispatch`] → [`machine`] → [`ledger`] → [`storage`] → [`sync`],
//! wired together by [`widget::CartController`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lazy;
pub mod ledger;
pub mod lookup;
pub mod machine;
pub mod render;
pub mod storage;
pub mod surface;
pub mod sync;
pub mod widget;
