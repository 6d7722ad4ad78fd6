//! Customer session bootstrap state machine.
//!
//! ```text
//!             NoToken / ProfileFailed
//!   Checking ─────────────────────────▶ Anonymous
//!      │                                  │  ▲
//!      │ ProfileLoaded        LoggedIn    │  │ LoggedOut
//!      ▼                                  ▼  │
//!   Authenticated ◀───────────────────────────┘
//! ```
//!
//! `LoggedOut` moves any state to `Anonymous`. `LoggedIn` from
//! `Authenticated` replaces the profile (re-login). Events that do not apply
//! to the current state leave it unchanged.

use serde::{Deserialize, Serialize};

/// Where a visitor's session stands.
///
/// Generic over the profile type so the storefront can carry its Shopify
/// customer without this crate knowing about Shopify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState<P> {
    /// A stored token has not been validated yet.
    #[default]
    Checking,
    /// No valid token.
    Anonymous,
    /// Token validated; profile loaded.
    Authenticated(P),
}

/// Inputs that drive [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent<P> {
    /// No token was found in storage.
    NoToken,
    /// The profile round-trip for the stored token succeeded.
    ProfileLoaded(P),
    /// The profile round-trip failed (rejected token or transport error).
    ProfileFailed,
    /// Login or registration succeeded.
    LoggedIn(P),
    /// The customer logged out or the session expired.
    LoggedOut,
}

impl<P> SessionState<P> {
    /// Apply an event and return the next state.
    #[must_use]
    pub fn apply(self, event: SessionEvent<P>) -> Self {
        match (self, event) {
            (_, SessionEvent::LoggedOut)
            | (Self::Checking, SessionEvent::NoToken | SessionEvent::ProfileFailed) => {
                Self::Anonymous
            }
            (Self::Checking, SessionEvent::ProfileLoaded(profile))
            | (Self::Anonymous | Self::Authenticated(_), SessionEvent::LoggedIn(profile)) => {
                Self::Authenticated(profile)
            }
            (state, _) => state,
        }
    }

    /// The profile, when authenticated.
    #[must_use]
    pub const fn profile(&self) -> Option<&P> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Checking | Self::Anonymous => None,
        }
    }

    /// Whether a customer is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = SessionState<&'static str>;
    type Event = SessionEvent<&'static str>;

    #[test]
    fn test_initial_state_is_checking() {
        let state = State::default();
        assert_eq!(state, State::Checking);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_no_token_goes_anonymous() {
        let state = State::Checking.apply(Event::NoToken);
        assert_eq!(state, State::Anonymous);
    }

    #[test]
    fn test_only_successful_profile_fetch_authenticates() {
        assert_eq!(
            State::Checking.apply(Event::ProfileLoaded("ada")),
            State::Authenticated("ada")
        );
        assert_eq!(State::Checking.apply(Event::ProfileFailed), State::Anonymous);
    }

    #[test]
    fn test_logout_always_anonymous() {
        assert_eq!(State::Checking.apply(Event::LoggedOut), State::Anonymous);
        assert_eq!(State::Anonymous.apply(Event::LoggedOut), State::Anonymous);
        assert_eq!(
            State::Authenticated("ada").apply(Event::LoggedOut),
            State::Anonymous
        );
    }

    #[test]
    fn test_login_and_relogin() {
        let state = State::Anonymous.apply(Event::LoggedIn("ada"));
        assert_eq!(state.profile(), Some(&"ada"));

        let state = state.apply(Event::LoggedIn("grace"));
        assert_eq!(state, State::Authenticated("grace"));
    }

    #[test]
    fn test_stray_events_are_ignored() {
        assert_eq!(
            State::Anonymous.apply(Event::ProfileLoaded("ada")),
            State::Anonymous
        );
        assert_eq!(
            State::Authenticated("ada").apply(Event::NoToken),
            State::Authenticated("ada")
        );
        // Login is only meaningful once the bootstrap has resolved.
        assert_eq!(State::Checking.apply(Event::LoggedIn("ada")), State::Checking);
    }
}
