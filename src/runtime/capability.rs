//! Capability interfaces between the bridge and an embedded runtime.

use crate::types::{CallOptions, Config, Result};

/// A resolved transformation callable.
///
/// Implementations acquire whatever execution lock their runtime requires
/// inside `apply` and release it before returning.
pub trait Transformer: Send + Sync {
    /// Transform `text` with the fixed named `options`.
    fn apply(&self, text: &str, options: &CallOptions) -> Result<String>;

    /// Human-readable identity of the callable, used in diagnostics.
    fn name(&self) -> String;
}

/// Performs the one-time setup sequence and resolves a [`Transformer`].
///
/// Called with the bridge's exclusion lock held. A failed `load` must not
/// leave anything behind that a later attempt depends on: the bridge
/// retries the full sequence on the next call.
#[cfg_attr(test, mockall::automock)]
pub trait Loader: Send + Sync {
    fn load(&self, config: &Config) -> Result<Box<dyn Transformer>>;
}
