//! Customer session extractor and helpers.
//!
//! The token and the profile validated against it live in the session. The
//! [`CurrentCustomer`] extractor resolves them into a [`SessionState`] before
//! the handler runs, revalidating with Shopify only when a token has no
//! cached profile.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use wzzptom_core::SessionState;

use crate::error::AppError;
use crate::models::session_keys;
use crate::services::account::bootstrap_session;
use crate::shopify::{Customer, CustomerAccessToken};
use crate::state::AppState;

/// Resolved customer session for the current request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentCustomer(state): CurrentCustomer) -> impl IntoResponse {
///     match state.profile() {
///         Some(c) => format!("Welcome back, {}", c.display_name()),
///         None => "Guest visitor".to_string(),
///     }
/// }
/// ```
pub struct CurrentCustomer(pub SessionState<Customer>);

impl FromRequestParts<AppState> for CurrentCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let resolved = bootstrap_session(state.storefront(), session).await?;
        tracing::debug!(authenticated = resolved.is_authenticated(), "Customer session resolved");
        Ok(Self(resolved))
    }
}

/// Read the stored customer token.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn customer_token(
    session: &Session,
) -> Result<Option<CustomerAccessToken>, tower_sessions::session::Error> {
    session.get(session_keys::SHOPIFY_CUSTOMER_TOKEN).await
}

/// Store a customer token.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_customer_token(
    session: &Session,
    token: &CustomerAccessToken,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::SHOPIFY_CUSTOMER_TOKEN, token)
        .await
}

/// Read the profile validated against the stored token.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn customer_profile(
    session: &Session,
) -> Result<Option<Customer>, tower_sessions::session::Error> {
    session.get(session_keys::CUSTOMER_PROFILE).await
}

/// Cache a validated profile.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_customer_profile(
    session: &Session,
    customer: &Customer,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CUSTOMER_PROFILE, customer)
        .await
}

/// Forget the customer. The cart is left alone.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_customer(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CustomerAccessToken>(session_keys::SHOPIFY_CUSTOMER_TOKEN)
        .await?;
    session
        .remove::<Customer>(session_keys::CUSTOMER_PROFILE)
        .await?;
    Ok(())
}
