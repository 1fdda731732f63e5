//! User Settings Module
//!
//! Theme preference and streaming-session configuration. Values persist
//! as untyped strings through `platform::prefs`; typed parsing lives
//! here. Configuration assembly (`stream_config`) is pure and stateless
//! so the same settings and user always produce the same config.

pub mod settings;
pub mod stream;
pub mod theme;

pub use settings::Settings;
pub use stream::{SafetyThreshold, StreamConfig, stream_config, websocket_url};
pub use theme::ThemePreference;
