//! Router-level test harness for the Wzzptom storefront.
//!
//! [`TestApp`] builds the real router with its Shopify and Formspree clients
//! pointed at `httpmock` servers, then drives it with
//! `tower::ServiceExt::oneshot`. A [`Browser`] carries the session cookie
//! between requests the way a real browser would.
//!
//! ```rust,ignore
//! let app = TestApp::new();
//! let mut browser = app.browser();
//! let page = browser.get("/sound-kits").await;
//! assert_eq!(page.status, StatusCode::OK);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use httpmock::MockServer;
use secrecy::SecretString;
use tower::ServiceExt;

use wzzptom_storefront::config::{ShopifyConfig, StorefrontConfig};
use wzzptom_storefront::content::{BUNDLED_CONTENT_DIR, ContentStore};
use wzzptom_storefront::middleware::session::SESSION_COOKIE_NAME;
use wzzptom_storefront::services::FormSubmissionClient;
use wzzptom_storefront::shopify::{AdminClient, StorefrontClient};
use wzzptom_storefront::state::AppState;

/// Storefront GraphQL path on the mock server.
pub const STOREFRONT_PATH: &str = "/api/2024-01/graphql.json";
/// Admin GraphQL path on the mock server.
pub const ADMIN_PATH: &str = "/admin/api/2024-01/graphql.json";
/// Formspree form path on the mock server.
pub const FORMSPREE_PATH: &str = "/f/test-form";
/// Hosted checkout the cart redirects to.
pub const CHECKOUT_URL: &str = "https://payhip.com/b/v89gM";

/// Client IP sent on every request so the rate limiter can key on it.
const CLIENT_IP: &str = "203.0.113.10";

/// Storefront wired to mock upstreams.
pub struct TestApp {
    pub router: Router,
    pub shopify: MockServer,
    pub formspree: MockServer,
}

impl TestApp {
    /// App without an admin token.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    /// App with the admin metrics client enabled.
    #[must_use]
    pub fn with_admin() -> Self {
        Self::build(true)
    }

    fn build(with_admin: bool) -> Self {
        let shopify = MockServer::start();
        let formspree = MockServer::start();

        let config = test_config();
        let storefront =
            StorefrontClient::with_endpoint(shopify.url(STOREFRONT_PATH), "storefront-token")
                .unwrap();
        let admin = with_admin
            .then(|| AdminClient::with_endpoint(shopify.url(ADMIN_PATH), "shpat_admin").unwrap());
        let contact = FormSubmissionClient::with_endpoint(formspree.url(FORMSPREE_PATH)).unwrap();
        let content = ContentStore::load(&config.content_dir).unwrap();

        let state = AppState::with_clients(config, storefront, admin, contact, content);
        Self {
            router: wzzptom_storefront::app(state),
            shopify,
            formspree,
        }
    }

    /// A fresh visitor with no cookies.
    #[must_use]
    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        content_dir: PathBuf::from(BUNDLED_CONTENT_DIR),
        shopify: ShopifyConfig {
            store: "wzzptom-test.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            storefront_token: SecretString::from("storefront-token"),
            admin_token: None,
        },
        formspree_form_id: "test-form".to_string(),
        checkout_url: CHECKOUT_URL.to_string(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A response with its body read into a string.
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Sends requests with a persistent session cookie.
pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

impl Browser {
    pub async fn get(&mut self, path: &str) -> Page {
        let request = Request::get(path);
        self.send(request, Body::empty()).await
    }

    /// POST an urlencoded form body such as `product_id=autumn-v1`.
    pub async fn post_form(&mut self, path: &str, form: &str) -> Page {
        let request =
            Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(form.to_string())).await
    }

    /// Another tab of the same visitor: shares the current session cookie.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    /// Whether the visitor currently holds a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> Page {
        request = request.header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie.as_str());
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Some(pair) = value.to_str().ok().and_then(|v| v.split(';').next()) else {
                continue;
            };
            if pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Page {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

// =============================================================================
// Shopify response fixtures
// =============================================================================

/// `customerAccessTokenCreate` success.
#[must_use]
pub fn token_created(token: &str) -> serde_json::Value {
    serde_json::json!({ "data": { "customerAccessTokenCreate": {
        "customerAccessToken": { "accessToken": token, "expiresAt": "2030-01-01T00:00:00Z" },
        "customerUserErrors": []
    } } })
}

/// `getCustomerDetails` success; `admin` sets the `custom.admin` metafield.
#[must_use]
pub fn customer(admin: bool) -> serde_json::Value {
    let metafield = if admin {
        serde_json::json!({ "value": "Vero" })
    } else {
        serde_json::Value::Null
    };
    serde_json::json!({ "data": { "customer": {
        "id": "gid://shopify/Customer/7",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "metafield": metafield
    } } })
}

/// `getCustomerOrders` with a single paid, fulfilled order.
#[must_use]
pub fn one_order() -> serde_json::Value {
    serde_json::json!({ "data": { "customer": { "orders": { "edges": [
        { "node": {
            "id": "gid://shopify/Order/1",
            "name": "#1001",
            "orderNumber": 1001,
            "processedAt": "2024-03-02T10:00:00Z",
            "totalPrice": { "amount": "49.99", "currencyCode": "EUR" },
            "statusUrl": "https://shop.example.com/orders/1001",
            "financialStatus": "PAID",
            "fulfillmentStatus": "FULFILLED",
            "lineItems": { "edges": [
                { "node": { "title": "AUTUMN COLLECTION V1", "quantity": 1, "variant": null } }
            ] }
        } }
    ] } } } })
}
