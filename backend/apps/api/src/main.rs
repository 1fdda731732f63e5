//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::extract::Path;
use axum::response::Html;
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use kernel::id::ChatId;
use session::middleware::{GuardState, guard_route};
use session::{HttpAuthBackend, SessionConfig, session_router};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,session=info,settings=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth provider configuration
    let auth_base_url: Url = env::var("AUTH_BASE_URL")
        .expect("AUTH_BASE_URL must be set in environment")
        .parse()?;

    let auth_anon_key =
        env::var("AUTH_ANON_KEY").expect("AUTH_ANON_KEY must be set in environment");

    let mut config = if cfg!(debug_assertions) {
        SessionConfig::development()
    } else {
        SessionConfig::default()
    };
    if let Ok(origin) = env::var("SITE_ORIGIN") {
        config.site_origin = origin.parse()?;
    }
    let config = Arc::new(config);

    // A missing streaming key must not prevent startup; the warning is
    // surfaced here, once.
    let stream_api_key = env::var("STREAM_API_KEY").ok();
    if settings::websocket_url(stream_api_key.as_deref()).is_some() {
        tracing::info!("Streaming endpoint configured");
    }

    let backend = Arc::new(HttpAuthBackend::new(
        auth_base_url,
        auth_anon_key,
        config.clone(),
    ));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let guard = GuardState {
        factory: backend.clone(),
        config: config.clone(),
    };

    // Build router: page routes behind the guard, API routes outside it
    let app = Router::new()
        .route("/", get(landing_page))
        .route("/login", get(login_page))
        .route("/app", get(app_page))
        .route("/app/chat/{chat_id}", get(chat_page))
        .route("/auth/callback", get(oauth_callback_page))
        .layer(middleware::from_fn(move |req, next| {
            let guard = guard.clone();
            async move { guard_route(guard, req, next).await }
        }))
        .nest("/api/session", session_router(backend.clone(), config.clone()))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

// Minimal page bodies; the client application renders the real UI.

async fn landing_page() -> Html<&'static str> {
    Html("<!doctype html><title>Theta</title><p>Welcome to Theta.</p>")
}

async fn login_page() -> Html<&'static str> {
    Html("<!doctype html><title>Sign in</title><p>Sign in to continue.</p>")
}

async fn app_page() -> Html<&'static str> {
    Html("<!doctype html><title>Theta</title><div id=\"app\"></div>")
}

/// Chat view. A malformed id is rejected before the page renders.
async fn chat_page(Path(chat_id): Path<ChatId>) -> Html<&'static str> {
    tracing::debug!(%chat_id, "Chat page requested");
    Html("<!doctype html><title>Theta</title><div id=\"app\"></div>")
}

/// OAuth callback landing. The provider handshake completes client-side:
/// this page's script posts the delivered tokens to
/// `POST /api/session/callback`, which sets the session cookie. The
/// guard never evaluates this path.
async fn oauth_callback_page() -> Html<&'static str> {
    Html("<!doctype html><title>Signing in</title><p>Completing sign-in...</p>")
}

async fn health() -> &'static str {
    "ok"
}
