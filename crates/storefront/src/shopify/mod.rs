//! Shopify Storefront and Admin API clients.
//!
//! # APIs
//!
//! ## Storefront API
//! - Customer access tokens (login, renew), registration, password recovery
//! - Customer profile and order history, scoped by the customer's token
//!
//! ## Admin API
//! - Store metrics for customers flagged as admins (order count, 30-day sales)
//!
//! Queries are plain strings sent through `graphql_client`'s request and
//! response envelopes. There is no local cache; Shopify is the source of truth.
//!
//! # Example
//!
//! ```rust,ignore
//! use wzzptom_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//! let token = client.login(&email, "hunter2").await?;
//! let customer = client.get_customer(&token.access_token).await?;
//! ```

mod admin;
mod graphql;
mod storefront;
pub mod types;

pub use admin::{AdminClient, AdminMetrics};
pub use storefront::{CreatedCustomer, DEFAULT_ORDER_COUNT, StorefrontClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response arrived.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from a mutation (bad credentials, taken email, ...).
    #[error("User error: {0}")]
    UserError(String),

    /// The customer access token no longer resolves to a customer.
    #[error("Invalid or expired AccessToken")]
    InvalidAccessToken,
}

impl ShopifyError {
    /// Build a GraphQL error from a single message.
    pub(crate) fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }])
    }

    /// Text suitable for showing to the customer.
    ///
    /// User errors and the first GraphQL error message are passed through;
    /// everything else falls back to the error's display form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UserError(message) => message.clone(),
            Self::GraphQL(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .find(|m| !m.is_empty())
                .map_or_else(|| self.to_string(), String::from),
            _ => self.to_string(),
        }
    }

    /// Whether this failure indicates the customer token has expired.
    ///
    /// Shopify does not return a dedicated code for this on every query, so
    /// the message is checked for `expired` or `AccessToken`.
    #[must_use]
    pub fn is_token_expiry(&self) -> bool {
        if matches!(self, Self::InvalidAccessToken) {
            return true;
        }
        let message = self.user_message();
        message.contains("expired") || message.contains("AccessToken")
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
        assert_eq!(err.user_message(), "Field not found");
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("customer".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: customer.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = ShopifyError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "HTTP error: 500 Internal Server Error");
    }

    #[test]
    fn test_token_expiry_detection() {
        assert!(ShopifyError::InvalidAccessToken.is_token_expiry());
        assert!(ShopifyError::graphql("Token has expired").is_token_expiry());
        assert!(ShopifyError::graphql("Invalid customerAccessToken").is_token_expiry());
        assert!(ShopifyError::UserError("AccessToken is invalid".to_string()).is_token_expiry());

        assert!(!ShopifyError::graphql("Throttled").is_token_expiry());
        assert!(!ShopifyError::Status(reqwest::StatusCode::BAD_GATEWAY).is_token_expiry());
    }
}
