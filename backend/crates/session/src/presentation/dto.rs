//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::entity::Session;

/// Callback completion request (POST /api/session/callback)
///
/// Carries the tokens the provider delivered to the callback page.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallbackRequest {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds, as the provider reports it
    pub expires_in: i64,
}

/// Session status response (GET /api/session/status)
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

impl SessionStatusResponse {
    pub fn authenticated(session: &Session) -> Self {
        Self {
            authenticated: true,
            user_id: Some(session.user.id.to_string()),
            email: session.user.email.clone(),
            display_name: session.user.display_name.clone(),
            expires_at_ms: Some(session.expires_at_ms),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user_id: None,
            email: None,
            display_name: None,
            expires_at_ms: None,
        }
    }
}
