//! One-shot vendor installer driven by an answer file
//! (`setup.exe /configure configuration.xml`).
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::error::ResourceError;
use super::{Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Resolve `path` to an absolute, non-UNC path.
///
/// # Errors
///
/// Returns [`ResourceError::NotFound`] if the path does not exist.
pub fn absolute(path: &Path) -> Result<PathBuf, ResourceError> {
    dunce::canonicalize(path).map_err(|_| ResourceError::NotFound {
        resource: path.display().to_string(),
    })
}

/// An installer run with `/configure <answer file>`.
///
/// There is no queryable installed state: the installer itself is idempotent
/// with respect to the answer file, so the resource is always
/// [`ResourceState::Missing`] once both files exist.
#[derive(Debug)]
pub struct InstallerResource<'a> {
    /// Installer executable.
    pub setup: PathBuf,
    /// XML answer file.
    pub answer_file: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> InstallerResource<'a> {
    /// Create a new installer resource.
    #[must_use]
    pub const fn new(setup: PathBuf, answer_file: PathBuf, executor: &'a dyn Executor) -> Self {
        Self {
            setup,
            answer_file,
            executor,
        }
    }
}

impl Resource for InstallerResource<'_> {
    fn description(&self) -> String {
        format!(
            "{} /configure {}",
            self.setup.display(),
            self.answer_file.display()
        )
    }

    fn current_state(&self) -> Result<ResourceState> {
        for path in [&self.answer_file, &self.setup] {
            if !path.is_file() {
                return Ok(ResourceState::Invalid {
                    reason: format!("{} not found", path.display()),
                });
            }
        }
        Ok(ResourceState::Missing)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let setup = absolute(&self.setup)?;
        let answer_file = absolute(&self.answer_file)?;
        let dir = setup.parent().ok_or_else(|| ResourceError::InvalidState {
            resource: setup.display().to_string(),
            reason: "installer has no parent directory".to_string(),
        })?;

        let program = setup.to_string_lossy();
        let answer = answer_file.to_string_lossy();
        self.executor
            .run_in(dir, &program, &["/configure", &answer])
            .with_context(|| format!("running {program}"))?;
        Ok(ResourceChange::Applied)
    }
}
