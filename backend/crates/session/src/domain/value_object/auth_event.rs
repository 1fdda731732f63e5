//! Auth Events
//!
//! Event vocabulary of the auth backend's change subscription.

use crate::domain::entity::Session;

/// Event kinds emitted by the auth backend adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Sign-in completed (OAuth handshake finished)
    SignedIn,
    /// Sign-out completed
    SignedOut,
    /// Access token transparently refreshed
    TokenRefreshed,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
        }
    }
}

/// One delivery from the change subscription: the event plus the
/// provider's current session (None after sign-out).
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl SessionEvent {
    pub fn signed_in(session: Session) -> Self {
        Self {
            event: AuthEvent::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            event: AuthEvent::SignedOut,
            session: None,
        }
    }

    pub fn token_refreshed(session: Session) -> Self {
        Self {
            event: AuthEvent::TokenRefreshed,
            session: Some(session),
        }
    }
}
