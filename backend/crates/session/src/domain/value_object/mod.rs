//! Value Objects

pub mod auth_event;
pub mod loading_state;
pub mod redirect;
pub mod route_class;

pub use auth_event::{AuthEvent, SessionEvent};
pub use loading_state::LoadingState;
pub use redirect::{GuardDecision, RedirectIntent, decide};
pub use route_class::{RouteClass, RoutePolicy};
