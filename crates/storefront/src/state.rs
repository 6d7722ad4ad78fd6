//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::middleware::session::SessionLocks;
use crate::services::contact::{ContactError, FormSubmissionClient};
use crate::shopify::{AdminClient, ShopifyError, StorefrontClient};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Shopify client: {0}")]
    Shopify(#[from] ShopifyError),
    #[error("contact client: {0}")]
    Contact(#[from] ContactError),
    #[error("content: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Per-visitor data lives in the session; the
/// state only adds the locks that serialize updates to it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    admin: Option<AdminClient>,
    contact: FormSubmissionClient,
    content: ContentStore,
    session_locks: SessionLocks,
}

impl AppState {
    /// Build clients from configuration and load the markdown pages.
    ///
    /// The admin client is only created when an admin token is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built or the content
    /// directory cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let admin = config
            .shopify
            .admin_token
            .as_ref()
            .map(|token| AdminClient::new(&config.shopify, token))
            .transpose()?;
        let contact = FormSubmissionClient::new(&config.formspree_form_id)?;
        let content = ContentStore::load(&config.content_dir)?;

        tracing::info!(
            pages = content.len(),
            admin_metrics = admin.is_some(),
            "Application state ready"
        );

        Ok(Self::with_clients(config, storefront, admin, contact, content))
    }

    /// Assemble state from prebuilt parts (tests point the clients at mocks).
    #[must_use]
    pub fn with_clients(
        config: StorefrontConfig,
        storefront: StorefrontClient,
        admin: Option<AdminClient>,
        contact: FormSubmissionClient,
        content: ContentStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                admin,
                contact,
                content,
                session_locks: SessionLocks::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Shopify Admin API client, when configured.
    #[must_use]
    pub fn admin(&self) -> Option<&AdminClient> {
        self.inner.admin.as_ref()
    }

    #[must_use]
    pub fn contact(&self) -> &FormSubmissionClient {
        &self.inner.contact
    }

    /// Markdown pages.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Per-visitor locks for session writes.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }
}
