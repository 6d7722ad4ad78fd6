//! Marketing page handlers: home, services and FAQ.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{
    self, CREDITS, Credit, FAQ, FaqEntry, PRODUCTS, SERVICES, Service, TICKER, VALUE_POINTS,
    ValuePoint,
};
use crate::error::Result;

use super::layout::Layout;
use super::products::ProductCardView;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero_title: &'static str,
    pub hero_kicker: &'static str,
    pub hero_tagline: &'static str,
    pub trusted_by: &'static str,
    pub ticker: &'static [&'static str],
    pub credits: &'static [Credit],
    pub discography_url: &'static str,
    pub value_points: &'static [ValuePoint],
    pub about_kicker: &'static str,
    pub about_body: &'static str,
    pub about_quote: &'static str,
    pub years_active: u32,
    pub placements: u32,
    pub featured: Vec<ProductCardView>,
}

/// Display the home page.
#[instrument(skip(session))]
pub async fn home(session: Session) -> Result<impl IntoResponse> {
    Ok(HomeTemplate {
        layout: Layout::load(&session).await?,
        hero_title: catalog::HERO_TITLE,
        hero_kicker: catalog::HERO_KICKER,
        hero_tagline: catalog::HERO_TAGLINE,
        trusted_by: catalog::HERO_TRUSTED_BY,
        ticker: TICKER,
        credits: CREDITS,
        discography_url: catalog::DISCOGRAPHY_URL,
        value_points: VALUE_POINTS,
        about_kicker: catalog::ABOUT_KICKER,
        about_body: catalog::ABOUT_BODY,
        about_quote: catalog::ABOUT_QUOTE,
        years_active: catalog::YEARS_ACTIVE,
        placements: catalog::PLACEMENTS,
        featured: PRODUCTS.iter().map(ProductCardView::from).collect(),
    })
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub layout: Layout,
    pub intro: &'static str,
    pub services: &'static [Service],
}

#[instrument(skip(session))]
pub async fn services(session: Session) -> Result<impl IntoResponse> {
    Ok(ServicesTemplate {
        layout: Layout::load(&session).await?,
        intro: catalog::SERVICES_INTRO,
        services: SERVICES,
    })
}

/// FAQ page template.
#[derive(Template, WebTemplate)]
#[template(path = "faq.html")]
pub struct FaqTemplate {
    pub layout: Layout,
    pub entries: &'static [FaqEntry],
}

#[instrument(skip(session))]
pub async fn faq(session: Session) -> Result<impl IntoResponse> {
    Ok(FaqTemplate {
        layout: Layout::load(&session).await?,
        entries: FAQ,
    })
}
