//! Session-related types.
//!
//! Types stored in the session between requests.

use serde::{Deserialize, Serialize};

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Styling for a [`Flash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Success,
    Error,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Whether this is a success notice.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.kind, FlashKind::Success)
    }
}

/// Session keys.
pub mod keys {
    /// Key for the Shopify customer access token.
    pub const SHOPIFY_CUSTOMER_TOKEN: &str = "shopify_customer_token";

    /// Key for the customer profile validated against the stored token.
    pub const CUSTOMER_PROFILE: &str = "customer_profile";

    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the pending [`super::Flash`] notice.
    pub const FLASH: &str = "flash";
}
