//! Host runtime boundary for the MeLinh mini-app.
//!
//! This crate decides whether the app runs inside the mini-app host or a plain
//! browser, and wraps host calls so they degrade to a fallback value instead
//! of failing.

pub mod bridge;
pub mod environment;
pub mod profile;

pub use bridge::*;
pub use environment::*;
pub use profile::*;
