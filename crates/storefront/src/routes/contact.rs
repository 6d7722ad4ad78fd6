//! Contact form handlers.
//!
//! Submissions are relayed to Formspree. Failures re-render the form with the
//! visitor's input and an inline message; success shows the thank-you state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::contact::{ContactError, ContactMessage};
use crate::state::AppState;

use super::layout::Layout;

pub const STUDIO_EMAIL: &str = "info@wzzptom.com";
pub const STUDIO_LOCATION: &str = "Italy";

/// Values echoed back into the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// `?subject=` prefill from the services page.
#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub subject: Option<String>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub studio_email: &'static str,
    pub studio_location: &'static str,
    pub form: ContactForm,
    pub error: Option<String>,
    pub sent: bool,
}

impl ContactTemplate {
    fn new(layout: Layout, form: ContactForm) -> Self {
        Self {
            layout,
            studio_email: STUDIO_EMAIL,
            studio_location: STUDIO_LOCATION,
            form,
            error: None,
            sent: false,
        }
    }
}

/// Display the contact form.
#[instrument(skip(session))]
pub async fn show(session: Session, Query(query): Query<ContactQuery>) -> Result<impl IntoResponse> {
    let form = ContactForm {
        subject: query.subject.unwrap_or_default(),
        ..ContactForm::default()
    };
    Ok(ContactTemplate::new(Layout::load(&session).await?, form))
}

/// Relay a submission to Formspree.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<impl IntoResponse> {
    let layout = Layout::load(&session).await?;

    let result = match ContactMessage::new(&form.name, &form.email, &form.subject, &form.message) {
        Ok(message) => state.contact().submit(&message).await,
        Err(e) => Err(e),
    };

    let mut page = ContactTemplate::new(layout, form);
    match result {
        Ok(()) => {
            add_breadcrumb("contact", "Contact form sent", None);
            page.form = ContactForm::default();
            page.sent = true;
        }
        Err(ContactError::Client(e)) => {
            tracing::error!(error = %e, "Contact client misconfigured");
            page.error = Some(crate::services::contact::GENERIC_FAILURE.to_string());
        }
        Err(e) => page.error = Some(e.to_string()),
    }
    Ok(page)
}
