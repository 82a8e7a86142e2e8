//! Core types for the markdownify bridge.
//!
//! - **Errors**: bridge error types with thiserror derives
//! - **Config**: module names, behavior flags and call options

mod config;
mod errors;

pub use config::{CallOptions, Config, ObservabilityConfig};
pub use errors::{Error, Result};
