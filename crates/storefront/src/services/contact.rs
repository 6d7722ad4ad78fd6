//! Formspree client for the contact form.
//!
//! Messages are relayed as a form POST; Formspree emails them to the studio.
//! Nothing is stored locally.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use wzzptom_core::Email;

/// Formspree form endpoint base URL.
const BASE_URL: &str = "https://formspree.io/f";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shown when Formspree rejects a submission without saying why.
pub const GENERIC_FAILURE: &str = "Oops! There was a problem submitting your form";

/// Shown when Formspree could not be reached.
pub const NETWORK_FAILURE: &str = "Network error. Please try again later.";

/// Errors that can occur when submitting the contact form.
#[derive(Debug, Error)]
pub enum ContactError {
    /// A field failed validation before anything was sent.
    #[error("{0}")]
    Invalid(String),

    /// Formspree rejected the submission and listed its reasons.
    #[error("{0}")]
    Rejected(String),

    /// Formspree rejected the submission without a usable body.
    #[error("{GENERIC_FAILURE}")]
    Failed,

    /// The request never completed.
    #[error("{NETWORK_FAILURE}")]
    Network,

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// A validated contact form submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    name: String,
    email: Email,
    subject: String,
    message: String,
}

impl ContactMessage {
    /// Validate raw form fields.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::Invalid` naming the first missing or malformed
    /// field.
    pub fn new(
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<Self, ContactError> {
        let required = |value: &str, label: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ContactError::Invalid(format!("{label} is required.")))
            } else {
                Ok(trimmed.to_string())
            }
        };

        let name = required(name, "Name")?;
        let email = Email::parse(email).map_err(|e| ContactError::Invalid(e.to_string()))?;
        let subject = required(subject, "Subject")?;
        let message = required(message, "Message")?;

        Ok(Self {
            name,
            email,
            subject,
            message,
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    errors: Vec<FieldError>,
}

#[derive(Deserialize)]
struct FieldError {
    #[serde(default)]
    message: String,
}

/// Client that relays contact submissions to Formspree.
#[derive(Clone)]
pub struct FormSubmissionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl FormSubmissionClient {
    /// Create a client for a Formspree form id.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(form_id: &str) -> Result<Self, ContactError> {
        Self::with_endpoint(format!("{BASE_URL}/{}", urlencoding::encode(form_id)))
    }

    /// Create a client against an explicit endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, ContactError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Submit a message.
    ///
    /// # Errors
    ///
    /// - `Rejected` with Formspree's messages joined by `", "`
    /// - `Failed` when the rejection body has no `errors` list
    /// - `Network` when the request could not be completed
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn submit(&self, message: &ContactMessage) -> Result<(), ContactError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(message)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Contact form request failed");
                ContactError::Network
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Contact form submitted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "Formspree rejected submission");
        Err(rejection_from_body(&body))
    }
}

/// Turn a non-success Formspree body into the message shown to the visitor.
fn rejection_from_body(body: &str) -> ContactError {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return ContactError::Failed;
    };

    let message = parsed
        .errors
        .into_iter()
        .map(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if message.is_empty() {
        ContactError::Failed
    } else {
        ContactError::Rejected(message)
    }
}
