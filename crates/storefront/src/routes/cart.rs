//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Mutations are plain form posts
//! that redirect back to the page they came from; the drawer in `base.html`
//! renders whenever the cart is open. Concurrent posts from one visitor are
//! serialized by [`crate::middleware::session::serialize_session_writes`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use wzzptom_core::{Cart, ProductId};

use crate::catalog::{self, PRODUCTS};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::state::AppState;

use super::layout::{Layout, safe_return_path};
use super::products::ProductCardView;

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the visitor's cart (empty when none is stored).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Forms
// =============================================================================

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

/// Form data for actions that only redirect back.
#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    pub return_to: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    /// Shown when the cart is empty.
    pub recommended: Vec<ProductCardView>,
}

/// Display the cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    Ok(CartShowTemplate {
        layout: Layout::load(&session).await?,
        recommended: PRODUCTS.iter().map(ProductCardView::from).collect(),
    })
}

/// Add one copy of a product.
///
/// # Errors
///
/// Returns 404 for an unknown product id.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<CartItemForm>) -> Result<Redirect> {
    let product = catalog::find_product(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = load_cart(&session).await?;
    let quantity = cart.add(product);
    save_cart(&session, &cart).await?;

    tracing::debug!(product_id = %product.id, quantity, "Added to cart");
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));

    Ok(Redirect::to(&safe_return_path(
        form.return_to.as_deref(),
        "/cart",
    )))
}

/// Remove a product. Unknown ids are ignored.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<CartItemForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    if cart.remove(&ProductId::new(form.product_id)) {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to(&safe_return_path(
        form.return_to.as_deref(),
        "/cart",
    )))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session, Form(form): Form<ReturnForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Redirect::to(&safe_return_path(
        form.return_to.as_deref(),
        "/cart",
    )))
}

/// Open or close the cart drawer.
#[instrument(skip(session))]
pub async fn toggle(session: Session, Form(form): Form<ReturnForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    let open = cart.toggle();
    tracing::debug!(open, "Cart toggled");
    save_cart(&session, &cart).await?;
    Ok(Redirect::to(&safe_return_path(form.return_to.as_deref(), "/")))
}

/// Hand off to the hosted checkout.
///
/// Payment happens entirely on the checkout provider; an empty cart goes
/// back to the cart page instead.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart"));
    }

    tracing::info!(
        items = cart.item_count(),
        total = %cart.total(),
        "Redirecting to checkout"
    );
    Ok(Redirect::to(&state.config().checkout_url))
}
