//! Customer account flows: session bootstrap, sign in/up, password recovery,
//! order history and the admin metrics panel.
//!
//! Each function takes the Shopify client and the visitor's session and
//! leaves the session consistent: a stored token always has a validated
//! profile next to it, or neither is present.

use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use wzzptom_core::{CurrencyCode, Email, Price, SessionEvent, SessionState};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::customer::{
    clear_customer, customer_profile, customer_token, set_customer_profile, set_customer_token,
};
use crate::shopify::{
    AdminClient, Customer, CustomerAccessToken, DEFAULT_ORDER_COUNT, Order, ShopifyError,
    StorefrontClient,
};

pub const LOGIN_SUCCESS: &str = "Successfully logged in!";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const REGISTER_SUCCESS: &str = "Account created successfully! Welcome.";
pub const REGISTER_FAILED: &str = "Registration failed. Try a different email.";
pub const RECOVERY_SENT: &str = "Recovery link sent! Check your inbox (and spam folder).";
pub const RECOVERY_FAILED: &str = "Recovery failed. Please try again.";
pub const RECOVERY_EMAIL_MISSING: &str = "Please enter your email address first.";
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";
pub const ORDERS_FAILED: &str = "Failed to load orders.";
pub const ADMIN_METRICS_FAILED: &str = "Failed to load admin metrics.";
pub const ADMIN_METRICS_DISABLED: &str = "Admin metrics are not configured.";

/// Errors from the account flows.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input rejected before reaching Shopify.
    #[error("{0}")]
    Invalid(String),

    /// Shopify rejected the request or could not be reached.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// Session store failure.
    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),
}

impl AccountError {
    /// Message for the visitor.
    ///
    /// Validation and Shopify-provided messages pass through; transport and
    /// storage failures use `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Invalid(message) => message.clone(),
            Self::Shopify(err @ (ShopifyError::UserError(_) | ShopifyError::GraphQL(_))) => {
                err.user_message()
            }
            Self::Shopify(_) | Self::Session(_) => fallback.to_string(),
        }
    }
}

/// Resolve the visitor's session.
///
/// - no token: `Anonymous`
/// - unexpired token with a cached profile: `Authenticated`
/// - token without a profile, or past its `expiresAt`: one `get_customer`
///   round-trip; success caches the profile, any failure (including network
///   errors) clears the token
///
/// # Errors
///
/// Returns an error only if the session store fails.
#[instrument(skip_all)]
pub async fn bootstrap_session(
    client: &StorefrontClient,
    session: &Session,
) -> Result<SessionState<Customer>, tower_sessions::session::Error> {
    let state = SessionState::default();

    let Some(token) = customer_token(session).await? else {
        return Ok(state.apply(SessionEvent::NoToken));
    };

    if let Some(profile) = customer_profile(session).await? {
        if !token.is_expired() {
            return Ok(state.apply(SessionEvent::ProfileLoaded(profile)));
        }
        tracing::debug!("Stored customer token past expiry, revalidating");
    }

    match client.get_customer(&token.access_token).await {
        Ok(customer) => {
            set_customer_profile(session, &customer).await?;
            set_sentry_user(&customer.id, customer.email.as_deref());
            Ok(state.apply(SessionEvent::ProfileLoaded(customer)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Stored customer token rejected, clearing");
            clear_customer(session).await?;
            Ok(state.apply(SessionEvent::ProfileFailed))
        }
    }
}

/// Log in with email and password, then load and cache the profile.
///
/// # Errors
///
/// Returns `AccountError`; use [`AccountError::user_message`] with
/// [`LOGIN_FAILED`] for display.
#[instrument(skip(client, session, password))]
pub async fn sign_in(
    client: &StorefrontClient,
    session: &Session,
    email: &str,
    password: &str,
) -> Result<Customer, AccountError> {
    let email = parse_email(email)?;
    require_password(password)?;

    let token = client.login(&email, password).await?;
    establish(client, session, &token).await
}

/// Create an account, then log straight in.
///
/// # Errors
///
/// Returns `AccountError`; use [`AccountError::user_message`] with
/// [`REGISTER_FAILED`] for display.
#[instrument(skip(client, session, password, first_name, last_name))]
pub async fn sign_up(
    client: &StorefrontClient,
    session: &Session,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<Customer, AccountError> {
    let email = parse_email(email)?;
    require_password(password)?;

    let first_name = first_name.map(str::trim).filter(|s| !s.is_empty());
    let last_name = last_name.map(str::trim).filter(|s| !s.is_empty());

    client
        .register(&email, password, first_name, last_name)
        .await?;
    let token = client.login(&email, password).await?;
    establish(client, session, &token).await
}

/// Ask Shopify to send a password reset email.
///
/// # Errors
///
/// Returns `Invalid` with [`RECOVERY_EMAIL_MISSING`] when `email` is blank.
#[instrument(skip(client))]
pub async fn recover(client: &StorefrontClient, email: &str) -> Result<(), AccountError> {
    if email.trim().is_empty() {
        return Err(AccountError::Invalid(RECOVERY_EMAIL_MISSING.to_string()));
    }
    let email = parse_email(email)?;
    client.recover_password(&email).await?;
    Ok(())
}

/// Log out. The cart survives.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    clear_customer(session).await?;
    clear_sentry_user();
    Ok(())
}

/// Result of loading the order history.
#[derive(Debug)]
pub enum OrdersOutcome {
    /// Orders, newest first.
    Loaded(Vec<Order>),
    /// A non-expiry failure, with the message to show.
    Failed(String),
    /// The token expired and renewing it did not help. The caller should log
    /// the customer out.
    SessionExpired,
}

/// Fetch the order history, renewing the token at most once.
///
/// When the first fetch fails with an expiry indicator, the token is renewed,
/// the new token is stored, and the fetch is retried with it. Any failure in
/// that second round ends in [`OrdersOutcome::SessionExpired`].
///
/// # Errors
///
/// Returns an error only if the session store fails.
#[instrument(skip_all)]
pub async fn load_orders(
    client: &StorefrontClient,
    session: &Session,
    token: &CustomerAccessToken,
) -> Result<OrdersOutcome, tower_sessions::session::Error> {
    let err = match client.get_orders(&token.access_token, DEFAULT_ORDER_COUNT).await {
        Ok(orders) => return Ok(OrdersOutcome::Loaded(orders)),
        Err(err) => err,
    };

    if !err.is_token_expiry() {
        tracing::warn!(error = %err, "Failed to load orders");
        let message = match &err {
            ShopifyError::UserError(_) | ShopifyError::GraphQL(_) => err.user_message(),
            _ => ORDERS_FAILED.to_string(),
        };
        return Ok(OrdersOutcome::Failed(message));
    }

    tracing::info!("Customer token looks expired, renewing once");
    let renewed = match client.renew_token(&token.access_token).await {
        Ok(renewed) => renewed,
        Err(e) => {
            tracing::info!(error = %e, "Token renewal failed");
            return Ok(OrdersOutcome::SessionExpired);
        }
    };
    set_customer_token(session, &renewed).await?;

    match client.get_orders(&renewed.access_token, DEFAULT_ORDER_COUNT).await {
        Ok(orders) => Ok(OrdersOutcome::Loaded(orders)),
        Err(e) => {
            tracing::info!(error = %e, "Order fetch failed after renewal");
            Ok(OrdersOutcome::SessionExpired)
        }
    }
}

/// What the admin panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPanel {
    Loaded {
        orders_count: i64,
        /// 30-day sales, formatted.
        total_sales: String,
    },
    Unavailable(String),
}

/// Load the admin metrics panel.
pub async fn load_admin_panel(admin: Option<&AdminClient>) -> AdminPanel {
    let Some(admin) = admin else {
        return AdminPanel::Unavailable(ADMIN_METRICS_DISABLED.to_string());
    };

    match admin.metrics().await {
        Ok(metrics) => AdminPanel::Loaded {
            orders_count: metrics.orders_count,
            total_sales: Price::new(metrics.total_sales, CurrencyCode::EUR).display(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load admin metrics");
            AdminPanel::Unavailable(ADMIN_METRICS_FAILED.to_string())
        }
    }
}

/// Validate `token` by loading its profile, then store both.
async fn establish(
    client: &StorefrontClient,
    session: &Session,
    token: &CustomerAccessToken,
) -> Result<Customer, AccountError> {
    let customer = client.get_customer(&token.access_token).await?;

    // New login: new session id so a fixated cookie cannot inherit it
    session.cycle_id().await?;
    set_customer_token(session, token).await?;
    set_customer_profile(session, &customer).await?;

    set_sentry_user(&customer.id, customer.email.as_deref());
    tracing::info!(customer_id = %customer.id, "Customer signed in");
    Ok(customer)
}

fn parse_email(raw: &str) -> Result<Email, AccountError> {
    Email::parse(raw).map_err(|e| AccountError::Invalid(e.to_string()))
}

fn require_password(password: &str) -> Result<(), AccountError> {
    if password.is_empty() {
        return Err(AccountError::Invalid("Password is required.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;
    use tower_sessions::MemoryStore;

    use super::*;

    const PATH: &str = "/api/2024-01/graphql.json";

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn client(server: &MockServer) -> StorefrontClient {
        StorefrontClient::with_endpoint(server.url(PATH), "storefront-token").unwrap()
    }

    fn token(value: &str) -> CustomerAccessToken {
        serde_json::from_value(json!({
            "accessToken": value,
            "expiresAt": "2030-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn customer_json() -> serde_json::Value {
        json!({
            "id": "gid://shopify/Customer/1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "metafield": null
        })
    }

    fn orders_json() -> serde_json::Value {
        json!({ "data": { "customer": { "orders": { "edges": [] } } } })
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_is_anonymous() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200);
        });

        let state = bootstrap_session(&client(&server), &session()).await.unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_validates_token_once() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerDetails");
            then.status(200)
                .json_body(json!({ "data": { "customer": customer_json() } }));
        });

        let session = session();
        set_customer_token(&session, &token("tok")).await.unwrap();
        let client = client(&server);

        let first = bootstrap_session(&client, &session).await.unwrap();
        assert!(first.is_authenticated());

        // Cached profile: no second round-trip.
        let second = bootstrap_session(&client, &session).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_clears_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "data": { "customer": null } }));
        });

        let session = session();
        set_customer_token(&session, &token("stale")).await.unwrap();

        let state = bootstrap_session(&client(&server), &session).await.unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert!(customer_token(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_revalidates_expired_token_with_cached_profile() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerDetails");
            then.status(200).json_body(json!({ "data": { "customer": null } }));
        });

        let session = session();
        let expired: CustomerAccessToken = serde_json::from_value(json!({
            "accessToken": "old",
            "expiresAt": "2020-01-01T00:00:00Z"
        }))
        .unwrap();
        let profile: Customer = serde_json::from_value(customer_json()).unwrap();
        set_customer_token(&session, &expired).await.unwrap();
        set_customer_profile(&session, &profile).await.unwrap();

        let state = bootstrap_session(&client(&server), &session).await.unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(mock.calls(), 1);
        assert!(customer_token(&session).await.unwrap().is_none());
        assert!(customer_profile(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_network_error_clears_token() {
        let client = StorefrontClient::with_endpoint("http://127.0.0.1:9/graphql", "t").unwrap();
        let session = session();
        set_customer_token(&session, &token("tok")).await.unwrap();

        let state = bootstrap_session(&client, &session).await.unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert!(customer_token(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_stores_token_and_profile() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerAccessTokenCreate");
            then.status(200).json_body(json!({ "data": { "customerAccessTokenCreate": {
                "customerAccessToken": { "accessToken": "fresh", "expiresAt": "2030-01-01T00:00:00Z" },
                "customerUserErrors": []
            } } }));
        });
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerDetails");
            then.status(200)
                .json_body(json!({ "data": { "customer": customer_json() } }));
        });

        let session = session();
        let customer = sign_in(&client(&server), &session, "Ada@Example.com", "pw")
            .await
            .unwrap();

        assert_eq!(customer.display_name(), "Ada");
        assert_eq!(
            customer_token(&session).await.unwrap().unwrap().access_token,
            "fresh"
        );
        assert!(customer_profile(&session).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "data": { "customerAccessTokenCreate": {
                "customerAccessToken": null,
                "customerUserErrors": [{ "code": "UNIDENTIFIED_CUSTOMER", "message": "Unidentified customer" }]
            } } }));
        });

        let session = session();
        let err = sign_in(&client(&server), &session, "ada@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.user_message(LOGIN_FAILED), "Unidentified customer");
        assert!(customer_token(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_transport_failure_uses_fallback() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(503);
        });

        let err = sign_in(&client(&server), &session(), "ada@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.user_message(LOGIN_FAILED), LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_sign_up_registers_then_logs_in() {
        let server = MockServer::start();
        let register = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerCreate");
            then.status(200).json_body(json!({ "data": { "customerCreate": {
                "customer": { "id": "gid://shopify/Customer/1", "email": "ada@example.com" },
                "customerUserErrors": []
            } } }));
        });
        let login = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerAccessTokenCreate");
            then.status(200).json_body(json!({ "data": { "customerAccessTokenCreate": {
                "customerAccessToken": { "accessToken": "new", "expiresAt": "2030-01-01T00:00:00Z" },
                "customerUserErrors": []
            } } }));
        });
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerDetails");
            then.status(200)
                .json_body(json!({ "data": { "customer": customer_json() } }));
        });

        let session = session();
        sign_up(&client(&server), &session, "ada@example.com", "pw", Some(" Ada "), Some(""))
            .await
            .unwrap();

        assert_eq!(register.calls(), 1);
        assert_eq!(login.calls(), 1);
        assert!(customer_profile(&session).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_recover_requires_email() {
        let server = MockServer::start();
        let err = recover(&client(&server), "   ").await.unwrap_err();
        assert_eq!(err.user_message(RECOVERY_FAILED), RECOVERY_EMAIL_MISSING);
    }

    #[tokio::test]
    async fn test_recover_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerRecover");
            then.status(200).json_body(json!({ "data": { "customerRecover": {
                "customerUserErrors": []
            } } }));
        });

        recover(&client(&server), "ada@example.com").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_expired_orders_renew_exactly_once_then_expire() {
        let server = MockServer::start();
        let orders = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerOrders");
            then.status(200)
                .json_body(json!({ "errors": [{ "message": "Customer access token expired" }] }));
        });
        let renew = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerAccessTokenRenew");
            then.status(200).json_body(json!({ "data": { "customerAccessTokenRenew": {
                "customerAccessToken": { "accessToken": "renewed", "expiresAt": "2030-01-01T00:00:00Z" },
                "userErrors": []
            } } }));
        });

        let session = session();
        let outcome = load_orders(&client(&server), &session, &token("old"))
            .await
            .unwrap();

        assert!(matches!(outcome, OrdersOutcome::SessionExpired));
        assert_eq!(renew.calls(), 1);
        assert_eq!(orders.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_orders_recover_after_renewal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .body_includes("getCustomerOrders")
                .body_includes("\"customerAccessToken\":\"old\"");
            then.status(200).json_body(json!({ "data": { "customer": null } }));
        });
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerAccessTokenRenew");
            then.status(200).json_body(json!({ "data": { "customerAccessTokenRenew": {
                "customerAccessToken": { "accessToken": "renewed", "expiresAt": "2030-01-01T00:00:00Z" },
                "userErrors": []
            } } }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .body_includes("getCustomerOrders")
                .body_includes("\"customerAccessToken\":\"renewed\"");
            then.status(200).json_body(orders_json());
        });

        let session = session();
        let outcome = load_orders(&client(&server), &session, &token("old"))
            .await
            .unwrap();

        assert!(matches!(outcome, OrdersOutcome::Loaded(ref o) if o.is_empty()));
        assert_eq!(
            customer_token(&session).await.unwrap().unwrap().access_token,
            "renewed"
        );
    }

    #[tokio::test]
    async fn test_renewal_failure_expires_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerOrders");
            then.status(200).json_body(json!({ "data": { "customer": null } }));
        });
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerAccessTokenRenew");
            then.status(200).json_body(json!({ "data": { "customerAccessTokenRenew": {
                "customerAccessToken": null,
                "userErrors": [{ "message": "access token does not exist" }]
            } } }));
        });

        let outcome = load_orders(&client(&server), &session(), &token("old"))
            .await
            .unwrap();
        assert!(matches!(outcome, OrdersOutcome::SessionExpired));
    }

    #[tokio::test]
    async fn test_other_order_errors_do_not_renew() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("getCustomerOrders");
            then.status(200)
                .json_body(json!({ "errors": [{ "message": "Throttled" }] }));
        });
        let renew = server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("customerAccessTokenRenew");
            then.status(200);
        });

        let outcome = load_orders(&client(&server), &session(), &token("tok"))
            .await
            .unwrap();
        assert!(matches!(outcome, OrdersOutcome::Failed(ref m) if m == "Throttled"));
        assert_eq!(renew.calls(), 0);
    }

    #[tokio::test]
    async fn test_admin_panel_without_client() {
        assert_eq!(
            load_admin_panel(None).await,
            AdminPanel::Unavailable(ADMIN_METRICS_DISABLED.to_string())
        );
    }
}
