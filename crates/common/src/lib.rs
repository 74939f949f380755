//! Touchslot Common Utilities
//!
//! Shared infrastructure for all touchslot crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading (device capabilities and engine policy)

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
