//! Platform Infrastructure
//!
//! Cross-cutting infrastructure shared by the backend crates:
//! - `cookie` - Cookie parsing and Set-Cookie construction
//! - `prefs` - Local key-value preference storage

pub mod cookie;
pub mod prefs;
