//! Process-wide runtime state.

use std::fmt;

use super::Transformer;

/// The runtime handle guarded by the bridge's exclusion lock.
///
/// Empty until the first successful initialization; after that it holds the
/// resolved transformer for the rest of the process and is never cleared.
#[derive(Default)]
pub struct RuntimeState {
    transformer: Option<Box<dyn Transformer>>,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether initialization has completed.
    pub fn is_ready(&self) -> bool {
        self.transformer.is_some()
    }

    /// The resolved transformer, once ready.
    pub fn transformer(&self) -> Option<&dyn Transformer> {
        self.transformer.as_deref()
    }

    /// Record a successful initialization. A state that is already ready
    /// keeps its original transformer.
    pub(crate) fn install(&mut self, transformer: Box<dyn Transformer>) {
        if self.transformer.is_none() {
            self.transformer = Some(transformer);
        }
    }
}

impl fmt::Debug for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeState")
            .field("ready", &self.is_ready())
            .field("transformer", &self.transformer.as_ref().map(|t| t.name()))
            .finish()
    }
}
