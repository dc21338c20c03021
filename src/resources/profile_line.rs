//! A single line that must appear in a shell profile script.
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::fs::{ensure_parent_dir, read_optional};
use super::{Resource, ResourceChange, ResourceState};

/// Ensures `line` is present in the file at `path`.
///
/// Presence is a literal substring search, so lines containing regex
/// metacharacters (`$`, `(`, `|`) match exactly as written.
#[derive(Debug, Clone)]
pub struct ProfileLineResource {
    /// Profile script path.
    pub path: PathBuf,
    /// Line that must be present.
    pub line: String,
}

impl ProfileLineResource {
    /// Create a new profile line resource.
    #[must_use]
    pub const fn new(path: PathBuf, line: String) -> Self {
        Self { path, line }
    }
}

impl Resource for ProfileLineResource {
    fn description(&self) -> String {
        format!("{} contains '{}'", self.path.display(), self.line)
    }

    fn current_state(&self) -> Result<ResourceState> {
        match read_optional(&self.path)? {
            Some(content) if content.contains(self.line.as_str()) => Ok(ResourceState::Correct),
            _ => Ok(ResourceState::Missing),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let existing = read_optional(&self.path)?.unwrap_or_default();
        if existing.contains(self.line.as_str()) {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        ensure_parent_dir(&self.path)?;

        let separator = if existing.is_empty() || existing.ends_with('\n') {
            ""
        } else {
            "\n"
        };

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        writeln!(file, "{separator}{}", self.line)
            .with_context(|| format!("appending to {}", self.path.display()))?;

        Ok(ResourceChange::Applied)
    }
}
