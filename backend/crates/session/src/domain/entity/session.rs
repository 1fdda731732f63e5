//! Session Entity
//!
//! Server-verified proof of authenticated identity. The session is owned
//! by the external auth provider; this crate only ever holds read-only,
//! independently fetched copies. Created on sign-in completion, refreshed
//! transparently by the adapter, destroyed on sign-out or expiry.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

/// Subject identity carried inside a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider-issued user ID
    pub id: UserId,
    /// Primary email, if the provider shared one
    pub email: Option<String>,
    /// Display name from provider metadata
    pub display_name: Option<String>,
}

impl UserIdentity {
    /// Label used when naming the user (display name, else email)
    pub fn label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
    }
}

/// A currently valid authentication. Absence of a `Session` means
/// unauthenticated; the tokens are opaque to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Subject identity
    pub user: UserIdentity,
    /// Opaque access token presented to the provider
    pub access_token: String,
    /// Opaque refresh capability
    pub refresh_token: String,
    /// Issuance timestamp
    pub issued_at: DateTime<Utc>,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn identity(display_name: Option<&str>, email: Option<&str>) -> UserIdentity {
        UserIdentity {
            id: UserId::new(),
            email: email.map(String::from),
            display_name: display_name.map(String::from),
        }
    }

    pub(crate) fn session_expiring_in(minutes: i64) -> Session {
        let now = Utc::now();
        Session {
            user: identity(Some("Ada"), Some("ada@example.com")),
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            issued_at: now,
            expires_at_ms: (now + Duration::minutes(minutes)).timestamp_millis(),
        }
    }

    #[test]
    fn test_expiry() {
        assert!(!session_expiring_in(60).is_expired());
        assert!(session_expiring_in(-1).is_expired());
    }

    #[test]
    fn test_remaining_ms_floors_at_zero() {
        assert_eq!(session_expiring_in(-5).remaining_ms(), 0);
        assert!(session_expiring_in(5).remaining_ms() > 0);
    }

    #[test]
    fn test_identity_label_prefers_display_name() {
        assert_eq!(
            identity(Some("Ada"), Some("ada@example.com")).label(),
            Some("Ada")
        );
        assert_eq!(
            identity(None, Some("ada@example.com")).label(),
            Some("ada@example.com")
        );
        assert_eq!(identity(None, None).label(), None);
    }
}
