//! Application Layer
//!
//! The session store, the sign-in flow controller, and the client half
//! of the redirect coordinator.

pub mod config;
pub mod redirect;
pub mod sign_in;
pub mod store;

// Re-exports
pub use config::SessionConfig;
pub use redirect::RedirectGate;
pub use sign_in::SignInFlow;
pub use store::{SessionStore, StoreSnapshot};
