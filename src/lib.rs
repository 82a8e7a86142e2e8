//! # markdownify-bridge
//!
//! Native bridge to the `telegramify_markdown` Python package, callable
//! from any number of host threads:
//! - Lazy, idempotent interpreter start-up and callable resolution
//! - A process-wide exclusion lock around every call, with the GIL nested
//!   inside it
//! - Identity fallback: any failure returns the input unchanged
//! - A C ABI (`markdownify` / `free_result`) and a typed Rust API
//!
//! ## Architecture
//!
//! ```text
//!   C host ─→ ffi::markdownify ─┐
//!   Rust host ─→ transform ─────┴─→ Bridge ─→ Loader (once) ─→ Transformer
//!                                     │                          │
//!                               Mutex<RuntimeState>         python (GIL)
//! ```

#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod bridge;
pub mod escape;
pub mod ffi;
pub mod python;
pub mod runtime;
pub mod types;

// Internal utilities
pub mod observability;

use std::sync::OnceLock;

pub use bridge::{Bridge, BridgeStats, FallbackReason, Outcome};
pub use python::PythonLoader;
pub use runtime::{Loader, Transformer};
pub use types::{CallOptions, Config, Error, Result};

static GLOBAL: OnceLock<Bridge<PythonLoader>> = OnceLock::new();

/// The process-wide bridge used by the C ABI, configured with
/// [`Config::default`].
pub fn global() -> &'static Bridge<PythonLoader> {
    GLOBAL.get_or_init(|| Bridge::new(PythonLoader, Config::default()))
}

/// Transform `text` through the process-wide bridge.
///
/// Absent input returns absent output without initializing anything.
pub fn transform(text: Option<&str>) -> Option<String> {
    let text = text?;
    global().transform(Some(text))
}

/// Escape `text` for Telegram MarkdownV2 through the process-wide bridge.
/// Returns `text` unchanged when the runtime is unavailable and falls back
/// to [`escape::escape_basic`] only on an empty runtime result.
pub fn escape_markdown(text: &str) -> String {
    global().escape_markdown(text)
}

/// Install the tracing subscriber configured for the process-wide bridge.
/// Does not start the interpreter.
pub fn init_tracing() {
    global().init_tracing();
}
