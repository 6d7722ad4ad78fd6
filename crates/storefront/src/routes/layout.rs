//! Page chrome shared by every template: navigation, cart drawer and flash.

use tower_sessions::Session;

use wzzptom_core::{Cart, CartItem};

use crate::error::Result;
use crate::middleware::customer::customer_profile;
use crate::models::{Flash, session_keys};

use super::cart::load_cart;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.product.id.to_string(),
            name: item.product.name.clone(),
            category: item.product.category.label().to_string(),
            image: item.product.image.clone(),
            quantity: item.quantity,
            unit_price: item.product.price.display(),
            line_price: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
    pub is_open: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
            is_open: cart.is_open(),
        }
    }
}

/// Everything `base.html` needs.
pub struct Layout {
    pub cart: CartView,
    /// Set when a validated customer profile is cached in the session.
    pub customer_name: Option<String>,
    pub flash: Option<Flash>,
}

impl Layout {
    /// Build the chrome from the session, consuming any pending flash.
    ///
    /// Reads only what the session already holds; no Shopify round-trip.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self> {
        let cart = load_cart(session).await?;
        let customer_name = customer_profile(session)
            .await?
            .map(|c| c.display_name().to_string());
        let flash = take_flash(session).await?;

        Ok(Self {
            cart: CartView::from(&cart),
            customer_name,
            flash,
        })
    }
}

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, flash: Flash) -> Result<()> {
    session.insert(session_keys::FLASH, flash).await?;
    Ok(())
}

async fn take_flash(session: &Session) -> Result<Option<Flash>> {
    Ok(session.remove::<Flash>(session_keys::FLASH).await?)
}

/// Only same-site absolute paths are accepted as redirect targets.
#[must_use]
pub fn safe_return_path(candidate: Option<&str>, default: &'static str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => default.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::catalog::PRODUCTS;

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path(Some("/sound-kits"), "/cart"), "/sound-kits");
        assert_eq!(safe_return_path(Some("//evil.com"), "/cart"), "/cart");
        assert_eq!(safe_return_path(Some("https://evil.com"), "/cart"), "/cart");
        assert_eq!(safe_return_path(Some("/\\evil.com"), "/cart"), "/cart");
        assert_eq!(safe_return_path(None, "/cart"), "/cart");
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let mut cart = Cart::new();
        cart.add(&PRODUCTS[0]);
        cart.add(&PRODUCTS[0]);

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.items[0].line_price, "€99.98");
        assert_eq!(view.total, "€99.98");
        assert!(view.is_open);
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_flash(&session, Flash::success("Saved")).await.unwrap();

        let first = Layout::load(&session).await.unwrap();
        assert_eq!(first.flash, Some(Flash::success("Saved")));

        let second = Layout::load(&session).await.unwrap();
        assert!(second.flash.is_none());
        assert!(second.customer_name.is_none());
        assert_eq!(second.cart.item_count, 0);
    }
}
