//! Textbehind Common Utilities
//!
//! Shared infrastructure for all textbehind crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading (fonts, extractor command, style defaults)

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
