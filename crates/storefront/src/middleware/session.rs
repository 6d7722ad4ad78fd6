//! Session layer.
//!
//! Sessions live in memory: the cart and the customer token are the only
//! things stored, and both are expected to vanish when the process restarts.
//!
//! Handlers load, modify and store session data, and the session layer saves
//! the whole record after the handler returns. Two writes from the same
//! visitor can therefore overwrite each other; [`serialize_session_writes`]
//! runs outside the session layer and holds a per-cookie lock until the
//! record is saved.

use std::hash::{DefaultHasher, Hash, Hasher};

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};
use tokio::sync::{Mutex, MutexGuard};
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "wz_session";

/// Session expiry after inactivity (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer backed by an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Lock stripes for session writes.
const SESSION_LOCK_STRIPES: usize = 64;

/// Striped mutexes keyed by session cookie value.
///
/// Requests carrying the same cookie always map to the same stripe.
pub struct SessionLocks {
    stripes: [Mutex<()>; SESSION_LOCK_STRIPES],
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stripes: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Lock the stripe for a session cookie value.
    #[allow(clippy::indexing_slicing)] // stripe_for is always in range
    pub async fn lock(&self, session_cookie: &str) -> MutexGuard<'_, ()> {
        self.stripes[stripe_for(session_cookie)].lock().await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

fn stripe_for(session_cookie: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    session_cookie.hash(&mut hasher);
    let stripes = SESSION_LOCK_STRIPES as u64;
    usize::try_from(hasher.finish() % stripes).unwrap_or(0)
}

/// Value of the session cookie, if the request carries one.
fn session_cookie(request: &Request) -> Option<&str> {
    request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE_NAME)
                .and_then(|rest| rest.strip_prefix('='))
        })
}

/// Serialize unsafe-method requests per session.
///
/// Must wrap the session layer so the guard outlives the session save.
/// Safe methods and cookie-less requests pass straight through.
pub async fn serialize_session_writes(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method().is_safe() {
        return next.run(request).await;
    }
    let Some(cookie) = session_cookie(&request).map(str::to_owned) else {
        return next.run(request).await;
    };

    let _guard = state.session_locks().lock(&cookie).await;
    next.run(request).await
}
