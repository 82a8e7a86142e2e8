//! Embedded runtime seam.
//!
//! The bridge never talks to an interpreter directly. It holds a
//! [`RuntimeState`] that is filled exactly once by a [`Loader`], and every
//! call site depends only on the [`Transformer`] capability the loader
//! resolved.

mod capability;
mod state;

pub use capability::{Loader, Transformer};
pub use state::RuntimeState;

#[cfg(test)]
pub use capability::MockLoader;
