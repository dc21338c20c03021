//! Orchestration: dispatch each application to its handler, one at a time.
//!
//! For every application in document order the engine finds the handler,
//! makes the application's command available, runs the handler and folds
//! the per-setting outcomes into one [`Outcome`]. Failures are contained to
//! the application they occur in.
pub mod context;
pub mod dependency;

pub use context::{Context, ExecutionMode, home_dir};
pub use dependency::{DependencyResolver, PackageResolver};

use std::fmt;

use crate::config::{ApplicationSpec, ConfigurationDocument};
use crate::error::EngineError;
use crate::handlers::{Handler, SettingOutcome, SettingStatus, registry};
use crate::logging::AppStatus;

/// Final result for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one setting was changed (or would be, in dry-run).
    Applied,
    /// Nothing needed changing.
    Skipped,
    /// Resolution, the handler or one of its settings failed.
    Failed {
        /// Diagnostic for the first failure.
        reason: String,
    },
    /// No handler is registered for the application name.
    Unsupported,
}

impl Outcome {
    const fn status(&self) -> AppStatus {
        match self {
            Self::Applied => AppStatus::Applied,
            Self::Skipped => AppStatus::Skipped,
            Self::Failed { .. } => AppStatus::Failed,
            Self::Unsupported => AppStatus::Unsupported,
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Everything the engine learned about one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationResult {
    /// Application name as written in the document.
    pub name: String,
    /// Aggregated outcome.
    pub outcome: Outcome,
    /// Per-setting detail (empty when the handler never ran).
    pub settings: Vec<SettingOutcome>,
}

/// Fold per-setting outcomes into an application outcome.
///
/// Any failure wins; otherwise any applied setting makes the application
/// applied. Warnings count as skipped.
#[must_use]
pub fn aggregate(settings: &[SettingOutcome]) -> Outcome {
    let failures: Vec<String> = settings
        .iter()
        .filter_map(|s| match &s.status {
            SettingStatus::Failed(reason) => Some(format!("{}: {reason}", s.key)),
            _ => None,
        })
        .collect();
    if !failures.is_empty() {
        return Outcome::failed(failures.join("; "));
    }
    if settings.iter().any(|s| s.status == SettingStatus::Applied) {
        Outcome::Applied
    } else {
        Outcome::Skipped
    }
}

/// Process every application in `document` with the built-in handlers.
///
/// Never fails as a whole; each application's problems are captured in its
/// [`ApplicationResult`] and recorded through `ctx.log`.
#[must_use]
pub fn run(document: &ConfigurationDocument, ctx: &Context) -> Vec<ApplicationResult> {
    run_with(document, ctx, registry::resolve)
}

fn run_with<'h>(
    document: &ConfigurationDocument,
    ctx: &Context,
    resolve: impl Fn(&str) -> Option<&'h dyn Handler>,
) -> Vec<ApplicationResult> {
    let mut results = Vec::with_capacity(document.len());
    for (name, spec) in document.apps() {
        let result = if ctx.is_cancelled() {
            ApplicationResult {
                name: name.to_string(),
                outcome: Outcome::failed(EngineError::Cancelled.to_string()),
                settings: Vec::new(),
            }
        } else {
            ctx.log.stage(name);
            process(name, spec, resolve(name), ctx)
        };
        record(ctx, &result);
        results.push(result);
    }
    results
}

fn process(
    name: &str,
    spec: &ApplicationSpec,
    handler: Option<&dyn Handler>,
    ctx: &Context,
) -> ApplicationResult {
    let finish = |outcome, settings| ApplicationResult {
        name: name.to_string(),
        outcome,
        settings,
    };

    let Some(handler) = handler else {
        ctx.log
            .warn(&EngineError::HandlerNotFound(name.to_string()).to_string());
        return finish(Outcome::Unsupported, Vec::new());
    };

    if let Err(e) = ctx
        .resolver
        .ensure_available(&spec.command, &spec.source, ctx.mode)
    {
        ctx.log.error(&e.to_string());
        return finish(Outcome::failed(e.to_string()), Vec::new());
    }

    match handler.apply(&spec.settings, ctx) {
        Ok(settings) => {
            for s in &settings {
                ctx.log.debug(&format!("{}: {}", s.key, s.status));
            }
            finish(aggregate(&settings), settings)
        }
        Err(e) => {
            ctx.log.error(&format!("{name}: {e:#}"));
            finish(Outcome::failed(format!("{e:#}")), Vec::new())
        }
    }
}

fn record(ctx: &Context, result: &ApplicationResult) {
    let message = match &result.outcome {
        Outcome::Failed { reason } => Some(reason.as_str()),
        _ => None,
    };
    ctx.log
        .record_app(&result.name, result.outcome.status(), message);
}
