//! Markdown page handlers (story, licensing, terms, privacy).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::layout::Layout;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub title: String,
    pub description: String,
    /// Formatted "last updated" date, when the page declares one.
    pub updated_at: Option<String>,
    pub content_html: String,
}

/// Serve a markdown page by slug.
///
/// # Errors
///
/// Returns 404 if no page has that slug.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let page = state
        .content()
        .get_page(&slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        layout: Layout::load(&session).await?,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page
            .meta
            .updated_at
            .map(|d| d.format("%B %-d, %Y").to_string()),
        content_html: page.content_html.clone(),
    })
}
