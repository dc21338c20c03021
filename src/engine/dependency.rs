//! Making an application's command available before its handler runs.
use std::sync::Arc;

use super::context::ExecutionMode;
use crate::error::EngineError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::resources::package::{PackageManager, PackageResource};
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Guarantees a command is present on the host.
#[cfg_attr(test, mockall::automock)]
pub trait DependencyResolver: Send + Sync {
    /// Ensure `command` is available, installing it from `source` if needed.
    ///
    /// Returns [`ResourceChange::AlreadyCorrect`] when nothing had to be done
    /// and [`ResourceChange::Applied`] when the package was installed (or
    /// would be, in dry-run). An empty `command` resolves trivially.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DependencyResolution`] if the command is missing
    /// and cannot be installed.
    fn ensure_available(
        &self,
        command: &str,
        source: &str,
        mode: ExecutionMode,
    ) -> Result<ResourceChange, EngineError>;
}

/// Resolves commands through the platform package manager.
pub struct PackageResolver {
    executor: Arc<dyn Executor>,
    manager: Option<PackageManager>,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for PackageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageResolver")
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl PackageResolver {
    /// Create a resolver; `manager` is `None` on platforms without one.
    #[must_use]
    pub fn new(
        executor: Arc<dyn Executor>,
        manager: Option<PackageManager>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            executor,
            manager,
            log,
        }
    }
}

impl DependencyResolver for PackageResolver {
    fn ensure_available(
        &self,
        command: &str,
        source: &str,
        mode: ExecutionMode,
    ) -> Result<ResourceChange, EngineError> {
        let command = command.trim();
        if command.is_empty() || self.executor.which(command) {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        let fail = |reason: String| EngineError::DependencyResolution {
            command: command.to_string(),
            source_id: source.to_string(),
            reason,
        };

        if source.trim().is_empty() {
            return Err(fail("not installed and no source given".to_string()));
        }
        let Some(manager) = self.manager else {
            return Err(fail(
                "not installed and no supported package manager is available".to_string(),
            ));
        };

        let package = PackageResource::new(source.to_string(), manager, &*self.executor);
        let state = package
            .current_state()
            .map_err(|e| fail(format!("{e:#}")))?;
        if state == ResourceState::Correct {
            self.log.debug(&format!(
                "{} installed but '{command}' is not on PATH",
                package.description()
            ));
            return Ok(ResourceChange::AlreadyCorrect);
        }

        if mode.is_dry_run() {
            self.log
                .dry_run(&format!("would install {}", package.description()));
            return Ok(ResourceChange::Applied);
        }

        self.log
            .info(&format!("installing {}", package.description()));
        match package.apply().map_err(|e| fail(format!("{e:#}")))? {
            ResourceChange::Skipped { reason } => Err(fail(reason)),
            change => Ok(change),
        }
    }
}
