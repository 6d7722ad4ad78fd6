//! Domain types for the Shopify customer operations.
//!
//! Field names follow the Storefront API's camelCase JSON. The same types are
//! stored in the session, so they round-trip through serde unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wzzptom_core::{FinancialStatus, FulfillmentStatus, format_money};

/// Metafield values that grant the admin role.
const ADMIN_FLAG_VALUES: &[&str] = &["true", "Vero"];

// =============================================================================
// Money
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Format for display, e.g. `€49.99`.
    #[must_use]
    pub fn display(&self) -> String {
        format_money(&self.amount, &self.currency_code)
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Customer access token issued by `customerAccessTokenCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccessToken {
    /// Bearer value sent as `customerAccessToken`.
    pub access_token: String,
    /// When Shopify stops honouring the token.
    pub expires_at: DateTime<Utc>,
}

impl CustomerAccessToken {
    /// Whether the token's advertised expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Error attached to a customer mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerUserError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

// =============================================================================
// Customer
// =============================================================================

/// A single metafield value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub value: String,
}

/// Customer profile as returned by the `customer` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `custom.admin` metafield.
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

impl Customer {
    /// Whether the `custom.admin` metafield marks this customer as an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.metafield
            .as_ref()
            .is_some_and(|m| ADMIN_FLAG_VALUES.contains(&m.value.as_str()))
    }

    /// First name, falling back to the email, then to a generic greeting.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Producer")
    }

    /// Get the customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

/// Edge in a [`Connection`].
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Drop the edge wrappers.
    #[must_use]
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}

/// Image reference on a variant.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

/// Variant reference on a line item.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemVariant {
    pub image: Option<Image>,
}

/// One product entry in a placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: i64,
    pub variant: Option<LineItemVariant>,
}

impl LineItem {
    /// Variant image URL, if the variant still exists and has one.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.variant
            .as_ref()
            .and_then(|v| v.image.as_ref())
            .map(|i| i.url.as_str())
    }
}

/// A placed order, newest first in history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Display name such as `#1001`.
    pub name: String,
    pub order_number: i64,
    pub processed_at: DateTime<Utc>,
    pub total_price: Money,
    pub status_url: String,
    #[serde(default)]
    pub financial_status: Option<FinancialStatus>,
    pub fulfillment_status: FulfillmentStatus,
    /// First five line items.
    pub line_items: Connection<LineItem>,
}
