//! Shared state handed to every handler during a run.
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use super::dependency::DependencyResolver;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;

/// Whether mutating actions are performed or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Perform every change.
    Apply,
    /// Run all read-only checks, log `would …` instead of mutating.
    DryRun,
}

impl ExecutionMode {
    /// Build from the `--dry-run` flag.
    #[must_use]
    pub const fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Apply }
    }

    /// Whether this is [`ExecutionMode::DryRun`].
    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Everything a run needs besides the document itself.
pub struct Context {
    /// Logger for output and application recording.
    pub log: Arc<dyn Log>,
    /// Apply or dry-run.
    pub mode: ExecutionMode,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Makes application commands available before their handler runs.
    pub resolver: Arc<dyn DependencyResolver>,
    /// Detected platform information.
    pub platform: Platform,
    /// User's home directory path.
    pub home: PathBuf,
    /// Set by the Ctrl-C handler; checked between applications.
    cancel: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("mode", &self.mode)
            .field("executor", &self.executor)
            .field("resolver", &"<dyn DependencyResolver>")
            .field("platform", &self.platform)
            .field("home", &self.home)
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl Context {
    /// Create a new context.
    #[must_use]
    pub fn new(
        log: Arc<dyn Log>,
        mode: ExecutionMode,
        executor: Arc<dyn Executor>,
        resolver: Arc<dyn DependencyResolver>,
        platform: Platform,
        home: PathBuf,
    ) -> Self {
        Self {
            log,
            mode,
            executor,
            resolver,
            platform,
            home,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether mutating actions must be skipped.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.mode.is_dry_run()
    }

    /// Shared flag that, once set, stops the engine before the next
    /// application.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// Resolve the user's home directory.
///
/// # Errors
///
/// Returns an error if the HOME (or USERPROFILE on Windows) environment
/// variable is not set.
pub fn home_dir() -> Result<PathBuf> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE")
            .or_else(|_| std::env::var("HOME"))
            .map_err(|_| {
                anyhow::anyhow!("neither USERPROFILE nor HOME environment variable is set")
            })?
    } else {
        std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?
    };
    Ok(PathBuf::from(home))
}
