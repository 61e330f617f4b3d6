//! Shared types and blueprint wire format for micasa.
//!
//! A *blueprint* is a small JSON document describing how to detect a
//! package's installed version and how to install it on each supported
//! platform. This crate owns the data model; resolution against the running
//! platform lives in `micasa-core`.

pub mod blueprint;
pub mod types;

// Re-exports
pub use blueprint::*;
pub use types::*;
