//! Domain models for storefront.

pub mod session;

pub use session::{Flash, FlashKind, keys as session_keys};
