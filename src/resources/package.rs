//! Package installation through the platform package manager.
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Arch Linux packages (pacman).
    Pacman,
    /// Windows packages (winget).
    Winget,
    /// macOS packages (Homebrew).
    Brew,
}

impl PackageManager {
    /// Executable that must be on `PATH` for this manager to work.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Pacman => "pacman",
            Self::Winget => "winget",
            Self::Brew => "brew",
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

/// A system package that can be checked and installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name (or winget ID).
    pub name: String,
    /// Package manager to use.
    pub manager: PackageManager,
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(name: String, manager: PackageManager, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            manager,
            executor,
        }
    }
}

impl Resource for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.manager)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let result = match self.manager {
            PackageManager::Pacman => self.executor.run_unchecked("pacman", &["-Q", &self.name])?,
            PackageManager::Brew => self
                .executor
                .run_unchecked("brew", &["list", "--versions", &self.name])?,
            PackageManager::Winget => {
                let result = self.executor.run_unchecked(
                    "winget",
                    &[
                        "list",
                        "--id",
                        &self.name,
                        "--exact",
                        "--accept-source-agreements",
                    ],
                )?;
                // winget exits zero with a "No installed package" table too.
                return Ok(if result.success && result.stdout.contains(&self.name) {
                    ResourceState::Correct
                } else {
                    ResourceState::Missing
                });
            }
        };

        if result.success && !result.stdout.trim().is_empty() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.manager {
            PackageManager::Pacman => {
                self.executor.run(
                    "sudo",
                    &["pacman", "-S", "--needed", "--noconfirm", &self.name],
                )?;
                Ok(ResourceChange::Applied)
            }
            PackageManager::Brew => {
                self.executor.run("brew", &["install", &self.name])?;
                Ok(ResourceChange::Applied)
            }
            PackageManager::Winget => {
                let result = self.executor.run_unchecked(
                    "winget",
                    &[
                        "install",
                        "--id",
                        &self.name,
                        "--exact",
                        "--source",
                        "winget",
                        "--accept-source-agreements",
                        "--accept-package-agreements",
                    ],
                )?;
                if result.success {
                    Ok(ResourceChange::Applied)
                } else {
                    // winget writes most diagnostics to stdout, not stderr.
                    let detail = if result.stderr.trim().is_empty() {
                        result.stdout.trim().to_string()
                    } else {
                        format!("{}\n{}", result.stdout.trim(), result.stderr.trim())
                    };
                    Ok(ResourceChange::Skipped {
                        reason: format!("winget install failed: {detail}"),
                    })
                }
            }
        }
    }
}
