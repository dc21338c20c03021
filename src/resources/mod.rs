//! Idempotent resource primitives (check + apply pattern).
pub mod config_store;
pub mod error;
pub mod font;
pub mod fs;
pub mod installer;
pub mod json_property;
pub mod package;
pub mod profile_line;

use anyhow::Result;

/// State of a resource (config key, file line, JSON property, …).
///
/// # Examples
///
/// ```
/// use appconf_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "Bob".into() };
/// let skip = ResourceState::Invalid { reason: "settings file not found".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g. the file it lives in is absent).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use appconf_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "installer reported failure".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource could not be applied.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// Callers always read the state first and only call [`apply`](Self::apply)
/// for [`ResourceState::Missing`] or [`ResourceState::Incorrect`], and never
/// in dry-run mode. See [`crate::handlers::converge`].
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// Must not modify the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O
    /// failures, permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be applied due to I/O failures,
    /// a failing external command, or an unexpected on-disk shape.
    fn apply(&self) -> Result<ResourceChange>;
}
