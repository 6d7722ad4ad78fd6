//! Shopify Storefront API client for customer accounts.
//!
//! Every operation is a single POST; there are no retries. Mutations report
//! validation problems in `customerUserErrors` (or `userErrors` for token
//! renewal), and the first message is surfaced as [`ShopifyError::UserError`].

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use wzzptom_core::Email;

use super::graphql::GraphQLEndpoint;
use super::types::{Connection, Customer, CustomerAccessToken, CustomerUserError, Order};
use super::ShopifyError;
use crate::config::ShopifyConfig;

/// Number of orders shown in the account dashboard.
pub const DEFAULT_ORDER_COUNT: i64 = 10;

const LOGIN: &str = r"
    mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
        customerAccessTokenCreate(input: $input) {
            customerAccessToken {
                accessToken
                expiresAt
            }
            customerUserErrors {
                code
                message
            }
        }
    }
";

const REGISTER: &str = r"
    mutation customerCreate($input: CustomerCreateInput!) {
        customerCreate(input: $input) {
            customer {
                id
                email
            }
            customerUserErrors {
                code
                message
            }
        }
    }
";

const RECOVER: &str = r"
    mutation customerRecover($email: String!) {
        customerRecover(email: $email) {
            customerUserErrors {
                code
                message
            }
        }
    }
";

const RENEW: &str = r"
    mutation customerAccessTokenRenew($customerAccessToken: String!) {
        customerAccessTokenRenew(customerAccessToken: $customerAccessToken) {
            customerAccessToken {
                accessToken
                expiresAt
            }
            userErrors {
                message
            }
        }
    }
";

const GET_CUSTOMER: &str = r#"
    query getCustomerDetails($customerAccessToken: String!) {
        customer(customerAccessToken: $customerAccessToken) {
            firstName
            lastName
            email
            id
            metafield(namespace: "custom", key: "admin") {
                value
            }
        }
    }
"#;

const GET_ORDERS: &str = r"
    query getCustomerOrders($customerAccessToken: String!, $first: Int!) {
        customer(customerAccessToken: $customerAccessToken) {
            orders(first: $first, sortKey: PROCESSED_AT, reverse: true) {
                edges {
                    node {
                        id
                        name
                        orderNumber
                        processedAt
                        totalPrice {
                            amount
                            currencyCode
                        }
                        statusUrl
                        financialStatus
                        fulfillmentStatus
                        lineItems(first: 5) {
                            edges {
                                node {
                                    title
                                    quantity
                                    variant {
                                        image {
                                            url
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
struct InputVars<T> {
    input: T,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewCustomer<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
}

#[derive(Serialize)]
struct EmailVars<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenVars<'a> {
    customer_access_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrdersVars<'a> {
    customer_access_token: &'a str,
    first: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    customer_access_token_create: TokenPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenewData {
    customer_access_token_renew: TokenPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    customer_access_token: Option<CustomerAccessToken>,
    #[serde(default, alias = "userErrors")]
    customer_user_errors: Vec<CustomerUserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterData {
    customer_create: RegisterPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    customer: Option<CreatedCustomer>,
    #[serde(default)]
    customer_user_errors: Vec<CustomerUserError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecoverData {
    customer_recover: RecoverPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecoverPayload {
    #[serde(default)]
    customer_user_errors: Vec<CustomerUserError>,
}

#[derive(Deserialize)]
struct CustomerData {
    customer: Option<Customer>,
}

#[derive(Deserialize)]
struct OrdersData {
    customer: Option<CustomerOrders>,
}

#[derive(Deserialize)]
struct CustomerOrders {
    orders: Connection<Order>,
}

/// Customer created by `customerCreate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCustomer {
    pub id: String,
    pub email: Option<String>,
}

/// First user error as a [`ShopifyError::UserError`], if any.
fn first_user_error(errors: Vec<CustomerUserError>, fallback: &str) -> Option<ShopifyError> {
    errors.into_iter().next().map(|e| {
        let message = if e.message.is_empty() {
            fallback.to_string()
        } else {
            e.message
        };
        ShopifyError::UserError(message)
    })
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<GraphQLEndpoint>,
}

impl StorefrontClient {
    /// Create a client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );
        Self::with_endpoint(endpoint, config.storefront_token.expose_secret())
    }

    /// Create a client against an explicit GraphQL URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        Ok(Self {
            inner: Arc::new(GraphQLEndpoint::new(
                endpoint.into(),
                "X-Shopify-Storefront-Access-Token",
                access_token.into(),
            )?),
        })
    }

    /// Exchange credentials for a customer access token.
    ///
    /// # Errors
    ///
    /// Returns `UserError` with Shopify's message for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let data: LoginData = self
            .inner
            .execute(
                "customerAccessTokenCreate",
                LOGIN,
                InputVars {
                    input: Credentials {
                        email: email.as_str(),
                        password,
                    },
                },
            )
            .await?;

        let payload = data.customer_access_token_create;
        if let Some(err) = first_user_error(payload.customer_user_errors, "Login failed") {
            return Err(err);
        }
        payload
            .customer_access_token
            .ok_or_else(|| ShopifyError::UserError("Unidentified customer".to_string()))
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns `UserError` with Shopify's message (taken email, weak password).
    #[instrument(skip(self, password, first_name, last_name), fields(email = %email))]
    pub async fn register(
        &self,
        email: &Email,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<CreatedCustomer, ShopifyError> {
        let data: RegisterData = self
            .inner
            .execute(
                "customerCreate",
                REGISTER,
                InputVars {
                    input: NewCustomer {
                        email: email.as_str(),
                        password,
                        first_name,
                        last_name,
                    },
                },
            )
            .await?;

        let payload = data.customer_create;
        if let Some(err) = first_user_error(payload.customer_user_errors, "Registration failed")
        {
            return Err(err);
        }
        payload
            .customer
            .ok_or_else(|| ShopifyError::UserError("Registration failed".to_string()))
    }

    /// Ask Shopify to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns `UserError` when Shopify rejects the request.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn recover_password(&self, email: &Email) -> Result<(), ShopifyError> {
        let data: RecoverData = self
            .inner
            .execute(
                "customerRecover",
                RECOVER,
                EmailVars {
                    email: email.as_str(),
                },
            )
            .await?;

        first_user_error(data.customer_recover.customer_user_errors, "Recovery failed")
            .map_or(Ok(()), Err)
    }

    /// Exchange a still-valid token for a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `UserError` ("Token renewal failed" when Shopify gives no
    /// message) if the token cannot be renewed.
    #[instrument(skip(self, access_token))]
    pub async fn renew_token(
        &self,
        access_token: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let data: RenewData = self
            .inner
            .execute(
                "customerAccessTokenRenew",
                RENEW,
                TokenVars {
                    customer_access_token: access_token,
                },
            )
            .await?;

        let payload = data.customer_access_token_renew;
        if let Some(err) = first_user_error(payload.customer_user_errors, "Token renewal failed") {
            return Err(err);
        }
        payload
            .customer_access_token
            .ok_or_else(|| ShopifyError::UserError("Token renewal failed".to_string()))
    }

    /// Fetch the profile the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccessToken` when Shopify resolves the token to no
    /// customer.
    #[instrument(skip(self, access_token))]
    pub async fn get_customer(&self, access_token: &str) -> Result<Customer, ShopifyError> {
        let data: CustomerData = self
            .inner
            .execute(
                "getCustomerDetails",
                GET_CUSTOMER,
                TokenVars {
                    customer_access_token: access_token,
                },
            )
            .await?;

        data.customer.ok_or(ShopifyError::InvalidAccessToken)
    }

    /// Fetch the customer's most recent orders, newest first.
    ///
    /// A token that resolves to no customer is an error, not an empty list:
    /// Shopify answers `customer: null` for expired or revoked tokens, and
    /// reporting it as `InvalidAccessToken` lets
    /// [`crate::services::account::load_orders`] renew instead of showing
    /// "No orders yet" to a signed-out customer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccessToken` when Shopify resolves the token to no
    /// customer.
    #[instrument(skip(self, access_token))]
    pub async fn get_orders(
        &self,
        access_token: &str,
        first: i64,
    ) -> Result<Vec<Order>, ShopifyError> {
        let data: OrdersData = self
            .inner
            .execute(
                "getCustomerOrders",
                GET_ORDERS,
                OrdersVars {
                    customer_access_token: access_token,
                    first,
                },
            )
            .await?;

        data.customer
            .map(|c| c.orders.into_nodes())
            .ok_or(ShopifyError::InvalidAccessToken)
    }
}
