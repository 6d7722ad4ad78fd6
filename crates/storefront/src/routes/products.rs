//! Sound kit route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use wzzptom_core::Product;

use crate::catalog::{self, PRODUCTS};
use crate::error::Result;

use super::layout::Layout;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub image: String,
    pub features: Vec<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.label().to_string(),
            price: product.price.display(),
            description: product.description.clone(),
            image: product.image.clone(),
            features: product.features.clone(),
        }
    }
}

impl ProductCardView {
    /// First three features, for listing cards.
    #[must_use]
    pub fn highlights(&self) -> &[String] {
        self.features.get(..3).unwrap_or(&self.features)
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCardView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductCardView,
}

/// "Product Not Found" page.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub layout: Layout,
}

/// List all sound kits.
#[instrument(skip(session))]
pub async fn index(session: Session) -> Result<impl IntoResponse> {
    Ok(ProductIndexTemplate {
        layout: Layout::load(&session).await?,
        products: PRODUCTS.iter().map(ProductCardView::from).collect(),
    })
}

/// Show one sound kit; unknown ids get the not-found page with a 404.
#[instrument(skip(session))]
pub async fn show(session: Session, Path(id): Path<String>) -> Result<Response> {
    let layout = Layout::load(&session).await?;

    let Some(product) = catalog::find_product(&id) else {
        return Ok((StatusCode::NOT_FOUND, ProductNotFoundTemplate { layout }).into_response());
    };

    Ok(ProductShowTemplate {
        layout,
        product: ProductCardView::from(product),
    }
    .into_response())
}
