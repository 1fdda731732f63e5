//! Domain Entities

pub mod session;

pub use session::{Session, UserIdentity};
