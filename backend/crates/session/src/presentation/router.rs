//! Session Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::SessionConfig;
use crate::domain::adapter::{AuthBackend, RequestClientFactory};
use crate::presentation::handlers::{self, SessionAppState};

/// Create the session router for any adapter implementation
pub fn session_router<F>(factory: Arc<F>, config: Arc<SessionConfig>) -> Router
where
    F: RequestClientFactory + AuthBackend + 'static,
{
    let state = SessionAppState { factory, config };

    Router::new()
        .route("/status", get(handlers::session_status::<F>))
        .route("/callback", post(handlers::complete_sign_in::<F>))
        .with_state(state)
}
