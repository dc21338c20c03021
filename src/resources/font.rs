//! Installed-font detection and installation through `oh-my-posh font install`.
use std::path::PathBuf;

use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Where the list of installed font names comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// `fc-list : family` (Linux, macOS with fontconfig).
    FontConfig,
    /// File names inside font directories (Windows).
    Directories(Vec<PathBuf>),
}

impl FontSource {
    /// The Windows system and per-user font directories.
    #[must_use]
    pub fn windows_defaults() -> Self {
        let mut dirs = Vec::new();
        if let Some(windir) = std::env::var_os("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        }
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(
                PathBuf::from(local)
                    .join("Microsoft")
                    .join("Windows")
                    .join("Fonts"),
            );
        }
        Self::Directories(dirs)
    }
}

/// A font that must be installed, matched by display-name substring.
#[derive(Debug)]
pub struct FontResource<'a> {
    /// Font name as understood by `oh-my-posh font install` (e.g. `Meslo`).
    pub name: String,
    source: FontSource,
    executor: &'a dyn Executor,
}

impl<'a> FontResource<'a> {
    /// Create a new font resource.
    #[must_use]
    pub const fn new(name: String, source: FontSource, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            source,
            executor,
        }
    }

    fn installed_names(&self) -> Result<Vec<String>> {
        match &self.source {
            FontSource::FontConfig => {
                let result = self.executor.run_unchecked("fc-list", &[":", "family"])?;
                if !result.success {
                    return Ok(Vec::new());
                }
                Ok(result.stdout.lines().map(str::to_string).collect())
            }
            FontSource::Directories(dirs) => {
                let mut names = Vec::new();
                for dir in dirs {
                    let Ok(entries) = std::fs::read_dir(dir) else {
                        continue;
                    };
                    names.extend(
                        entries
                            .flatten()
                            .map(|e| e.file_name().to_string_lossy().into_owned()),
                    );
                }
                Ok(names)
            }
        }
    }
}

/// Case-insensitive substring match of `wanted` against any installed name.
///
/// Spaces are ignored so `Meslo LGM` matches `MesloLGMNerdFont-Regular.ttf`.
#[must_use]
pub fn matches_installed(wanted: &str, installed: &[String]) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    let wanted = normalize(wanted);
    if wanted.is_empty() {
        return false;
    }
    installed.iter().any(|name| normalize(name).contains(&wanted))
}

impl Resource for FontResource<'_> {
    fn description(&self) -> String {
        format!("font {}", self.name)
    }

    fn current_state(&self) -> Result<ResourceState> {
        if matches_installed(&self.name, &self.installed_names()?) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor
            .run("oh-my-posh", &["font", "install", &self.name])?;
        Ok(ResourceChange::Applied)
    }
}
