//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::SessionConfig;
use crate::domain::adapter::{AuthBackend, RequestAuthClient, RequestClientFactory};
use crate::error::SessionResult;
use crate::presentation::dto::{CallbackRequest, SessionStatusResponse};

/// Shared state for session handlers
pub struct SessionAppState<F>
where
    F: RequestClientFactory + 'static,
{
    pub factory: Arc<F>,
    pub config: Arc<SessionConfig>,
}

impl<F> Clone for SessionAppState<F>
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

// ============================================================================
// Sign-In Completion
// ============================================================================

/// POST /api/session/callback
///
/// Completes an OAuth sign-in. The callback page's script reads the
/// token fragment the provider delivered and posts it here; the
/// response body reports the established session and the Set-Cookie
/// headers hand the route guard what it verifies on later requests.
pub async fn complete_sign_in<F>(
    State(state): State<SessionAppState<F>>,
    Json(req): Json<CallbackRequest>,
) -> SessionResult<impl IntoResponse>
where
    F: RequestClientFactory + AuthBackend + 'static,
{
    let completion = state
        .factory
        .complete_sign_in(&req.access_token, &req.refresh_token, req.expires_in)
        .await?;

    tracing::info!(user = %completion.session.user.id, "OAuth sign-in completed");

    let mut response =
        Json(SessionStatusResponse::authenticated(&completion.session)).into_response();
    platform::cookie::append_set_cookies(response.headers_mut(), &completion.cookies);

    Ok(response)
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/session/status
///
/// Unlike the route guard this endpoint fails open: a verification
/// error reports "not authenticated" rather than an error page, so
/// polling consumers always reach a settled answer.
pub async fn session_status<F>(
    State(state): State<SessionAppState<F>>,
    headers: HeaderMap,
) -> SessionResult<impl IntoResponse>
where
    F: RequestClientFactory + 'static,
{
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let client = state.factory.client_for(cookie_header.as_deref());

    let session = match client.verify_session().await {
        Ok(session) => session,
        Err(e) => {
            e.log();
            None
        }
    };

    let refreshed = client.refreshed_cookies();

    let body = match session {
        Some(ref session) => SessionStatusResponse::authenticated(session),
        None => SessionStatusResponse::anonymous(),
    };

    let mut response = Json(body).into_response();
    platform::cookie::append_set_cookies(response.headers_mut(), &refreshed);

    Ok(response)
}
