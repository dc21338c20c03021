//! Domain-specific error types for the configuration engine.
//!
//! Internal modules return typed errors built with [`thiserror`]; the command
//! layer converts them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError  : fatal to the whole run (missing/unparsable document)
//! EngineError  : fatal to one application (dependency, dispatch, cancel)
//! SettingError : fatal to one setting or step, or to one application when
//!                a required precondition is not met
//! ```
//!
//! Resource-level failures live in [`crate::resources::error::ResourceError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the configuration document.
///
/// Any of these aborts the run before a single application is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration document does not exist.
    #[error("configuration file not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The document could not be read.
    #[error("IO error reading configuration file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid YAML/JSON/TOML or does not match the
    /// expected `apps` layout.
    #[error("invalid configuration in {}: {message}", .path.display())]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The document's extension does not name a supported format.
    #[error("unsupported configuration format: {} (expected .yaml, .yml, .json or .toml)", .path.display())]
    UnsupportedFormat {
        /// Path with the unrecognised extension.
        path: PathBuf,
    },

    /// A `--set` argument is not of the form `name=value`.
    #[error("invalid placeholder '{0}': expected name=value")]
    InvalidPlaceholder(String),
}

/// Errors that end processing of a single application.
///
/// The engine records these as outcomes; they never abort the run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The application's command could not be made available.
    #[error("dependency '{command}' could not be resolved from '{source_id}': {reason}")]
    DependencyResolution {
        /// Logical command name.
        command: String,
        /// Installation source identifier.
        source_id: String,
        /// Resolver diagnostic.
        reason: String,
    },

    /// No handler is registered for the application name.
    #[error("no handler registered for '{0}'")]
    HandlerNotFound(String),

    /// The run was interrupted before the application was processed.
    #[error("cancelled")]
    Cancelled,
}

/// Errors raised by handlers while applying settings.
#[derive(Error, Debug)]
pub enum SettingError {
    /// A setting value does not have the shape the handler expects.
    #[error("setting '{key}' must be {expected}, found {found}")]
    Shape {
        /// Setting key.
        key: String,
        /// Expected shape (e.g. `"a string"`).
        expected: &'static str,
        /// Shape that was actually found.
        found: &'static str,
    },

    /// A required setting is absent.
    #[error("required setting '{0}' is missing")]
    Missing(String),

    /// Applying a setting or step failed.
    #[error("failed to apply '{key}': {reason}")]
    Apply {
        /// Setting key or step name.
        key: String,
        /// Captured diagnostic.
        reason: String,
    },

    /// A precondition for the whole application is not met.
    #[error("precondition failed: {0}")]
    Precondition(String),
}
