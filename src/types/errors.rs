//! Bridge error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. None of
//! them ever reach the caller of [`crate::transform`]; they exist so every
//! failure path can be logged with context before degrading to passthrough.

use thiserror::Error;

/// Bridge result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the markdownify bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The embedded interpreter could not be brought up.
    #[error("runtime start failed: {0}")]
    RuntimeStart(String),

    /// The transformation module could not be imported.
    #[error("module import failed: {0}")]
    ModuleImport(String),

    /// The callable is missing from the module or is not invocable.
    #[error("callable resolution failed: {0}")]
    CallableResolution(String),

    /// The customization module could not be imported or configured.
    #[error("customization failed: {0}")]
    Customization(String),

    /// Text could not cross the native/runtime boundary.
    #[error("marshal error: {0}")]
    Marshal(String),

    /// The callable raised.
    #[error("invocation failed: {0}")]
    Invocation(String),

    /// The callable returned something other than a string.
    #[error("unexpected return type: {0}")]
    UnexpectedType(String),
}

// Convenience constructors
impl Error {
    pub fn runtime_start(msg: impl Into<String>) -> Self {
        Self::RuntimeStart(msg.into())
    }

    pub fn module_import(msg: impl Into<String>) -> Self {
        Self::ModuleImport(msg.into())
    }

    pub fn callable_resolution(msg: impl Into<String>) -> Self {
        Self::CallableResolution(msg.into())
    }

    pub fn customization(msg: impl Into<String>) -> Self {
        Self::Customization(msg.into())
    }

    pub fn marshal(msg: impl Into<String>) -> Self {
        Self::Marshal(msg.into())
    }

    pub fn invocation(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }

    pub fn unexpected_type(msg: impl Into<String>) -> Self {
        Self::UnexpectedType(msg.into())
    }

    /// True for failures of the initialization sequence, which leave the
    /// runtime state uninitialized.
    pub fn is_init_failure(&self) -> bool {
        matches!(
            self,
            Error::RuntimeStart(_)
                | Error::ModuleImport(_)
                | Error::CallableResolution(_)
                | Error::Customization(_)
        )
    }
}
