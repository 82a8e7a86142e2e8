//! Configuration structures.
//!
//! The C ABI always runs with [`Config::default`], which carries the fixed
//! module names, behavior flags and call options. Rust hosts and tests may
//! build their own.

use serde::{Deserialize, Serialize};

/// Global bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Python module exposing the transformation callable.
    pub module: String,

    /// Name of the callable inside `module`.
    pub callable: String,

    /// Optional customization module holding the behavior flags.
    pub customize_module: String,

    /// Render citations as expandable blocks.
    pub cite_expandable: bool,

    /// Strict markdown validation inside the package.
    pub strict_markdown: bool,

    /// Fail initialization when the customization module cannot be
    /// imported or configured, instead of running with package defaults.
    pub require_customization: bool,

    /// Named options passed on every call.
    pub call_options: CallOptions,

    /// Observability configuration.
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module: "telegramify_markdown".to_string(),
            callable: "markdownify".to_string(),
            customize_module: "telegramify_markdown.customize".to_string(),
            cite_expandable: true,
            strict_markdown: false,
            require_customization: false,
            call_options: CallOptions::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Named options for the transformation callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallOptions {
    /// Maximum line length; `None` means no limit.
    pub max_line_length: Option<usize>,

    /// Collapse runs of whitespace.
    pub normalize_whitespace: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            max_line_length: None,
            normalize_whitespace: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
