//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Home (hero, ticker, credits, value prop, about)
//! GET  /services           - Production services
//! GET  /faq                - FAQ
//! GET  /contact            - Contact form (optional ?subject=)
//! POST /contact            - Relay to Formspree (rate limited)
//! GET  /legal/{slug}       - Markdown pages (story, licensing, terms, privacy)
//! GET  /health             - Liveness
//!
//! # Sound kits
//! GET  /sound-kits         - Product listing
//! GET  /sound-kits/{id}    - Product detail (unknown id: 404 page)
//!
//! # Cart
//! GET  /cart               - Cart page
//! POST /cart/add           - Add product
//! POST /cart/remove        - Remove product
//! POST /cart/clear         - Empty cart
//! POST /cart/toggle        - Open/close the drawer
//! GET  /checkout           - Redirect to hosted checkout
//!
//! # Account
//! GET  /account            - Login/register forms or dashboard
//! POST /account/login      - Sign in (rate limited)
//! POST /account/register   - Sign up (rate limited)
//! POST /account/recover    - Password recovery (rate limited)
//! POST /account/logout     - Sign out
//! ```
//!
//! Any other path redirects to `/`.

pub mod account;
pub mod cart;
pub mod contact;
pub mod home;
pub mod layout;
pub mod pages;
pub mod products;

use axum::{
    Router,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, contact_rate_limiter};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/toggle", post(cart::toggle))
}

/// Create the account routes router.
///
/// Credential posts share one rate limiter keyed by client IP.
pub fn account_routes() -> Router<AppState> {
    let credential_posts = Router::new()
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/recover", post(account::recover))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/", get(account::index))
        .route("/logout", post(account::logout))
        .merge(credential_posts)
}

/// Create the sound kit routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/services", get(home::services))
        .route("/faq", get(home::faq))
        .route("/legal/{slug}", get(pages::show))
        .route("/health", get(health))
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).layer(contact_rate_limiter())),
        )
        .nest("/sound-kits", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/account", account_routes())
        .fallback(fallback)
}

/// Liveness probe.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Unknown paths go home.
async fn fallback() -> Redirect {
    Redirect::to("/")
}
