//! Key/value entries in a tool's global configuration store (`git config`,
//! `npm config`).
use anyhow::Result;

use super::{Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A command-line tool that exposes a global key/value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStore {
    /// `git config --global`
    Git,
    /// `npm config`
    Npm,
}

impl ConfigStore {
    /// Program that owns the store.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Npm => "npm",
        }
    }

    fn get_args(self, key: &str) -> Vec<&str> {
        match self {
            Self::Git => vec!["config", "--global", "--get", key],
            Self::Npm => vec!["config", "get", key],
        }
    }

    fn set_args<'a>(self, key: &'a str, value: &'a str) -> Vec<&'a str> {
        match self {
            Self::Git => vec!["config", "--global", key, value],
            Self::Npm => vec!["config", "set", key, value],
        }
    }

    /// Interpret the query output, returning `None` when the key is unset.
    ///
    /// Only the line terminator the tool prints is removed; surrounding
    /// whitespace is part of the stored value.
    fn parse_current(self, success: bool, stdout: &str) -> Option<String> {
        let current = stdout.strip_suffix('\n').unwrap_or(stdout);
        let current = current.strip_suffix('\r').unwrap_or(current);
        if !success || current.is_empty() {
            return None;
        }
        // npm prints the literal "undefined" for unset keys and exits zero.
        if self == Self::Npm && current == "undefined" {
            return None;
        }
        Some(current.to_string())
    }
}

impl std::fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

/// One entry in a [`ConfigStore`] that can be checked and applied.
#[derive(Debug)]
pub struct ConfigEntryResource<'a> {
    /// Store that holds the entry.
    pub store: ConfigStore,
    /// Config key (e.g. `user.name`).
    pub key: String,
    /// Desired value, already rendered as text.
    pub desired_value: String,
    executor: &'a dyn Executor,
}

impl<'a> ConfigEntryResource<'a> {
    /// Create a new config entry resource.
    #[must_use]
    pub const fn new(
        store: ConfigStore,
        key: String,
        desired_value: String,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            store,
            key,
            desired_value,
            executor,
        }
    }
}

impl Resource for ConfigEntryResource<'_> {
    fn description(&self) -> String {
        format!("{} {} = {}", self.store, self.key, self.desired_value)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let result = self
            .executor
            .run_unchecked(self.store.program(), &self.store.get_args(&self.key))?;

        match self.store.parse_current(result.success, &result.stdout) {
            None => Ok(ResourceState::Missing),
            Some(current) if current == self.desired_value => Ok(ResourceState::Correct),
            Some(current) => Ok(ResourceState::Incorrect { current }),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor.run(
            self.store.program(),
            &self.store.set_args(&self.key, &self.desired_value),
        )?;
        Ok(ResourceChange::Applied)
    }
}
