//! Typed error variants for resource operations.
//!
//! Internal resource code returns these variants directly; callers convert
//! to [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A required file or program was not found.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// A resource exists but is in an unexpected or inconsistent state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or description of the resource in the invalid state.
        resource: String,
        /// Human-readable explanation of why the state is invalid.
        reason: String,
    },
}
