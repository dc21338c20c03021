//! Per-application settings handlers.
//!
//! Each supported application family implements [`Handler`]. The closed set
//! of handlers is listed in [`registry`].
pub mod config_store;
pub mod office;
pub mod oh_my_posh;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{SettingValue, Settings};
use crate::engine::Context;
use crate::error::SettingError;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// What happened to one setting (or one step of a multi-step handler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingStatus {
    /// The host was changed (or would be, in dry-run).
    Applied,
    /// The host already matched.
    Skipped,
    /// Nothing could be done, but this is not an error.
    Warning(String),
    /// Checking or applying failed.
    Failed(String),
}

impl fmt::Display for SettingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Skipped => f.write_str("skipped"),
            Self::Warning(reason) => write!(f, "warning: {reason}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome for a single setting key or step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingOutcome {
    /// Setting key or step name.
    pub key: String,
    /// What happened.
    pub status: SettingStatus,
}

impl SettingOutcome {
    /// Build an outcome.
    #[must_use]
    pub fn new(key: impl Into<String>, status: SettingStatus) -> Self {
        Self {
            key: key.into(),
            status,
        }
    }

    /// Build a [`SettingStatus::Failed`] outcome from an error chain.
    #[must_use]
    pub fn failed(key: impl Into<String>, error: &anyhow::Error) -> Self {
        Self::new(key, SettingStatus::Failed(format!("{error:#}")))
    }
}

/// A settings handler for one application family.
///
/// Handlers are stateless; everything they need arrives through `settings`
/// and `ctx`.
pub trait Handler: Sync {
    /// Canonical application name.
    fn name(&self) -> &'static str;

    /// Additional names that route to this handler.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Bring the host in line with `settings`.
    ///
    /// Per-setting problems are reported as outcomes; sibling settings are
    /// still attempted.
    ///
    /// # Errors
    ///
    /// Returns an error only when nothing for this application can proceed
    /// (e.g. a required setting is missing).
    fn apply(&self, settings: &Settings, ctx: &Context) -> Result<Vec<SettingOutcome>>;
}

/// Check a resource and apply it if needed, honouring the execution mode.
///
/// Errors never escape: they become [`SettingStatus::Failed`].
pub fn converge<R: Resource>(ctx: &Context, key: &str, resource: &R) -> SettingOutcome {
    let desc = resource.description();
    let state = match resource.current_state() {
        Ok(state) => state,
        Err(e) => {
            ctx.log.warn(&format!("failed to check {desc}: {e:#}"));
            return SettingOutcome::failed(key, &e);
        }
    };

    let status = match state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            SettingStatus::Skipped
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            SettingStatus::Warning(reason)
        }
        ResourceState::Incorrect { current } if ctx.is_dry_run() => {
            ctx.log
                .dry_run(&format!("would set {desc} (currently {current})"));
            SettingStatus::Applied
        }
        ResourceState::Missing if ctx.is_dry_run() => {
            ctx.log.dry_run(&format!("would set {desc}"));
            SettingStatus::Applied
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => apply_resource(ctx, resource),
    };
    SettingOutcome::new(key, status)
}

fn apply_resource<R: Resource>(ctx: &Context, resource: &R) -> SettingStatus {
    let desc = resource.description();
    match resource.apply() {
        Ok(ResourceChange::Applied) => {
            ctx.log.debug(&format!("set {desc}"));
            SettingStatus::Applied
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            ctx.log.debug(&format!("ok: {desc}"));
            SettingStatus::Skipped
        }
        Ok(ResourceChange::Skipped { reason }) => {
            ctx.log.warn(&format!("failed to set {desc}: {reason}"));
            SettingStatus::Failed(reason)
        }
        Err(e) => {
            ctx.log.warn(&format!("failed to set {desc}: {e:#}"));
            SettingStatus::Failed(format!("{e:#}"))
        }
    }
}

/// Fetch a required string setting.
///
/// # Errors
///
/// Returns [`SettingError::Missing`] if absent or
/// [`SettingError::Shape`] if it is not a string.
pub fn required_str<'s>(settings: &'s Settings, key: &str) -> Result<&'s str, SettingError> {
    optional_str(settings, key)?.ok_or_else(|| SettingError::Missing(key.to_string()))
}

/// Fetch an optional string setting; `null` counts as absent.
///
/// # Errors
///
/// Returns [`SettingError::Shape`] if present but not a string.
pub fn optional_str<'s>(settings: &'s Settings, key: &str) -> Result<Option<&'s str>, SettingError> {
    match settings.get(key) {
        None | Some(SettingValue::Null) => Ok(None),
        Some(SettingValue::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(SettingError::Shape {
            key: key.to_string(),
            expected: "a string",
            found: other.kind(),
        }),
    }
}

/// Replace a leading `~` with the home directory.
///
/// `~user` forms are left untouched.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) => rest
            .strip_prefix(['/', '\\'])
            .map_or_else(|| PathBuf::from(path), |tail| home.join(tail)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::engine::test_helpers::ContextBuilder;
    use std::cell::Cell;

    struct FakeResource {
        state: std::result::Result<ResourceState, String>,
        change: std::result::Result<ResourceChange, String>,
        applied: Cell<u32>,
    }

    impl FakeResource {
        fn new(state: ResourceState) -> Self {
            Self {
                state: Ok(state),
                change: Ok(ResourceChange::Applied),
                applied: Cell::new(0),
            }
        }
    }

    impl Resource for FakeResource {
        fn description(&self) -> String {
            "fake".to_string()
        }

        fn current_state(&self) -> Result<ResourceState> {
            self.state.clone().map_err(anyhow::Error::msg)
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.set(self.applied.get() + 1);
            self.change.clone().map_err(anyhow::Error::msg)
        }
    }

    #[test]
    fn correct_is_skipped_without_apply() {
        let (ctx, _log) = ContextBuilder::new().build();
        let r = FakeResource::new(ResourceState::Correct);
        assert_eq!(converge(&ctx, "k", &r).status, SettingStatus::Skipped);
        assert_eq!(r.applied.get(), 0);
    }

    #[test]
    fn missing_is_applied() {
        let (ctx, _log) = ContextBuilder::new().build();
        let r = FakeResource::new(ResourceState::Missing);
        assert_eq!(converge(&ctx, "k", &r).status, SettingStatus::Applied);
        assert_eq!(r.applied.get(), 1);
    }

    #[test]
    fn dry_run_reports_applied_without_apply() {
        let (ctx, log) = ContextBuilder::new().dry_run().build();
        let r = FakeResource::new(ResourceState::Incorrect {
            current: "old".to_string(),
        });
        assert_eq!(converge(&ctx, "k", &r).status, SettingStatus::Applied);
        assert_eq!(r.applied.get(), 0);
        assert_eq!(log.dry_runs(), vec!["would set fake (currently old)"]);
    }

    #[test]
    fn invalid_is_a_warning() {
        let (ctx, _log) = ContextBuilder::new().build();
        let r = FakeResource::new(ResourceState::Invalid {
            reason: "absent".to_string(),
        });
        assert_eq!(
            converge(&ctx, "k", &r).status,
            SettingStatus::Warning("absent".to_string())
        );
    }

    #[test]
    fn check_error_is_failed() {
        let (ctx, _log) = ContextBuilder::new().build();
        let mut r = FakeResource::new(ResourceState::Missing);
        r.state = Err("boom".to_string());
        assert_eq!(
            converge(&ctx, "k", &r).status,
            SettingStatus::Failed("boom".to_string())
        );
        assert_eq!(r.applied.get(), 0);
    }

    #[test]
    fn apply_error_and_skip_are_failed() {
        let (ctx, _log) = ContextBuilder::new().build();
        let mut r = FakeResource::new(ResourceState::Missing);
        r.change = Err("exit 1".to_string());
        assert_eq!(
            converge(&ctx, "k", &r).status,
            SettingStatus::Failed("exit 1".to_string())
        );

        r.change = Ok(ResourceChange::Skipped {
            reason: "denied".to_string(),
        });
        assert_eq!(
            converge(&ctx, "k", &r).status,
            SettingStatus::Failed("denied".to_string())
        );
    }

    #[test]
    fn string_accessors_check_shape() {
        let settings: Settings = [
            ("name", SettingValue::from("Meslo")),
            ("flag", SettingValue::Bool(true)),
            ("none", SettingValue::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(required_str(&settings, "name").unwrap(), "Meslo");
        assert!(matches!(
            required_str(&settings, "absent"),
            Err(SettingError::Missing(_))
        ));
        assert!(matches!(
            required_str(&settings, "none"),
            Err(SettingError::Missing(_))
        ));
        assert!(matches!(
            optional_str(&settings, "flag"),
            Err(SettingError::Shape {
                expected: "a string",
                found: "a boolean",
                ..
            })
        ));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = Path::new("/home/u");
        assert_eq!(expand_home("~", home), PathBuf::from("/home/u"));
        assert_eq!(expand_home("~/.zshrc", home), PathBuf::from("/home/u/.zshrc"));
        assert_eq!(expand_home("~other/x", home), PathBuf::from("~other/x"));
        assert_eq!(expand_home("/etc/profile", home), PathBuf::from("/etc/profile"));
    }
}
