//! Infrastructure Layer
//!
//! HTTP implementation of the auth backend adapter traits.

pub mod http;

pub use http::{HttpAuthBackend, HttpRequestClient};
