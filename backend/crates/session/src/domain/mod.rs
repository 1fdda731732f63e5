//! Domain Layer
//!
//! Session entity, state machine value objects, and the adapter
//! capability traits. No I/O here; everything is pure and testable.

pub mod adapter;
pub mod entity;
pub mod value_object;
