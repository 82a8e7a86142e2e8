//! Per-call outcome, collapsed to plain text at the public boundary.

use crate::types::Error;

/// Why a call returned its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Initialization failed; the runtime is not ready.
    Unavailable,
    /// Text could not cross the native/runtime boundary.
    Marshal,
    /// The callable raised or returned a non-string.
    Invocation,
}

impl From<&Error> for FallbackReason {
    fn from(err: &Error) -> Self {
        match err {
            _ if err.is_init_failure() => FallbackReason::Unavailable,
            Error::Marshal(_) => FallbackReason::Marshal,
            _ => FallbackReason::Invocation,
        }
    }
}

/// Result of one pass through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Transformed(String),
    Passthrough(FallbackReason),
}

impl Outcome {
    /// The text handed back to the caller: the transformed string, or a
    /// copy of `input` for any passthrough.
    pub fn into_text(self, input: &str) -> String {
        match self {
            Outcome::Transformed(text) => text,
            Outcome::Passthrough(_) => input.to_string(),
        }
    }
}
