//! Presentation Layer
//!
//! Route guard middleware, session status endpoint, and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
