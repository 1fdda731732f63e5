//! Sign-In Flow Controller
//!
//! Starts an OAuth sign-in with a fixed, explicit post-login destination
//! (the protected area root), independent of the page the user invoked
//! it from. This component has no UI: adapter errors propagate to the
//! caller (the session store) for display there.

use std::sync::Arc;

use crate::application::config::SessionConfig;
use crate::domain::adapter::{AuthBackend, AuthorizeRedirect, SignInOptions};
use crate::error::SessionResult;

/// Sign-in flow controller
pub struct SignInFlow<B>
where
    B: AuthBackend + Send + Sync + 'static,
{
    backend: Arc<B>,
    config: Arc<SessionConfig>,
}

impl<B> SignInFlow<B>
where
    B: AuthBackend + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<SessionConfig>) -> Self {
        Self { backend, config }
    }

    /// Begin the provider handshake; returns where to navigate.
    pub async fn start(&self) -> SessionResult<AuthorizeRedirect> {
        let options = SignInOptions {
            redirect_target: self.config.post_login_target()?,
            state: generate_state_nonce(),
        };

        let redirect = self.backend.begin_oauth_sign_in(&options).await?;

        tracing::info!(
            redirect_target = %options.redirect_target,
            "OAuth sign-in started"
        );

        Ok(redirect)
    }
}

/// Fresh per-attempt state nonce (URL-safe, 32 bytes of entropy)
fn generate_state_nonce() -> String {
    use base64::Engine;
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
