//! Application Configuration
//!
//! Configuration for the session application layer.

use url::Url;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::RoutePolicy;
use crate::error::{SessionError, SessionResult};

/// Session application configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Route classification the guard evaluates against
    pub route_policy: RoutePolicy,
    /// Session cookie name (set by the auth provider)
    pub session_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Public origin of this deployment (post-login redirect base)
    pub site_origin: Url,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            route_policy: RoutePolicy::default(),
            session_cookie_name: "theta_session".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            site_origin: Url::parse("http://localhost:3000").expect("static origin parses"),
        }
    }
}

impl SessionConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Fixed post-login destination: the protected area root, always,
    /// independent of the page sign-in was invoked from.
    pub fn post_login_target(&self) -> SessionResult<Url> {
        self.site_origin
            .join(self.route_policy.protected_root())
            .map_err(|e| SessionError::Internal(format!("Invalid post-login target: {e}")))
    }
}
