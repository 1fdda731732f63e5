//! Session (Authentication Session) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, state machine value objects, adapter traits
//! - `application/` - Session store, sign-in flow, redirect coordination
//! - `infra/` - HTTP implementation of the auth backend adapter
//! - `presentation/` - Route guard middleware, status endpoint, router
//!
//! ## Features
//! - Client-held session store with explicit loading states
//!   (`Initializing` / `Ready` / `SigningIn` / `SigningOut`)
//! - Per-request route guard deciding forward / redirect-to-login /
//!   redirect-to-app before any page content is produced
//! - One-shot client redirect gate (no repeated navigation on re-render)
//! - OAuth sign-in initiation with a fixed post-login destination
//!
//! ## Consistency Model
//! The guard and the store each hold independently fetched views of the
//! same provider session. The guard is authoritative for access control
//! and fails closed on adapter errors; the store is authoritative for UI
//! only and fails open so consumers always reach a settled loading state.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use infra::http::HttpAuthBackend;
pub use presentation::router::session_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::application::store::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
