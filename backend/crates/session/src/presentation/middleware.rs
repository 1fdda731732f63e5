//! Route Guard Middleware
//!
//! Evaluates every page navigation before any content is produced.
//! The outcome is a pure function of (session presence, path class);
//! re-running the guard on its own redirect target forwards, so chains
//! terminate after at most one redirect.
//!
//! The guard fails closed: if session verification errors, the request
//! is treated as unauthenticated. Cookies refreshed during verification
//! are carried onto the response for every outcome, redirects included,
//! so a refreshed session is not lost to the redirect.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::SessionConfig;
use crate::domain::adapter::{RequestAuthClient, RequestClientFactory};
use crate::domain::value_object::redirect::{GuardDecision, decide};

/// Guard middleware state
pub struct GuardState<F>
where
    F: RequestClientFactory + 'static,
{
    pub factory: Arc<F>,
    pub config: Arc<SessionConfig>,
}

impl<F> Clone for GuardState<F>
where
    F: RequestClientFactory + 'static,
{
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware guarding page routes by session presence
pub async fn guard_route<F>(
    state: GuardState<F>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    F: RequestClientFactory + 'static,
{
    let path = req.uri().path().to_string();
    let policy = &state.config.route_policy;

    // Static assets, API endpoints and the OAuth callback pass through
    // untouched; evaluating the callback would break the handshake.
    if policy.is_excluded(&path) {
        return next.run(req).await;
    }

    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let client = state.factory.client_for(cookie_header.as_deref());

    let session_present = match client.verify_session().await {
        Ok(session) => session.is_some(),
        Err(e) => {
            // Fail closed: a broken adapter never grants access.
            e.log();
            false
        }
    };

    let refreshed = client.refreshed_cookies();

    let mut response = match decide(session_present, policy.classify(&path)) {
        GuardDecision::Forward => next.run(req).await,
        GuardDecision::RedirectToLogin => {
            tracing::debug!(%path, "Unauthenticated on protected path");
            see_other(&policy.login_path)
        }
        GuardDecision::RedirectToApp => {
            tracing::debug!(%path, "Authenticated on login page");
            see_other(policy.protected_root())
        }
    };

    platform::cookie::append_set_cookies(response.headers_mut(), &refreshed);

    response
}

/// 303 See Other: the redirected navigation is always a GET.
fn see_other(location: &str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())]).into_response()
}
