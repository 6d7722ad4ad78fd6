//! Wzzptom Core - Shared domain types.
//!
//! This crate provides the types used across the storefront workspace:
//! - `storefront` - The public site (marketing pages, sound kits, account area)
//! - `integration-tests` - Router-level tests against a mocked Shopify
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no sessions. This keeps the cart arithmetic and the
//! session state machine testable without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for emails, prices, product ids and order statuses
//! - [`product`] - Catalog product definition
//! - [`cart`] - Cart aggregation
//! - [`session`] - Customer session bootstrap state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod product;
pub mod session;
pub mod types;

pub use cart::{Cart, CartItem};
pub use product::{Product, ProductCategory};
pub use session::{SessionEvent, SessionState};
pub use types::*;
