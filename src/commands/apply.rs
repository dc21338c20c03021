//! Command: apply a configuration document to the host.
use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context as _, Result};

use crate::cli::ApplyOpts;
use crate::config::{self, ConfigurationDocument, Placeholders};
use crate::engine::{self, Context, ExecutionMode, PackageResolver};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Platform;

/// Run the apply command against the real host.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, a `--set` assignment
/// is malformed, the home directory is unknown, or any application failed.
pub fn run(opts: &ApplyOpts, dry_run: bool, log: &Arc<Logger>) -> Result<()> {
    let document = prepare(opts, &**log)?;

    let platform = Platform::detect();
    log.debug(&format!("platform: {platform:?}"));

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let resolver = Arc::new(PackageResolver::new(
        Arc::clone(&executor),
        platform.package_manager(),
        Arc::clone(log) as Arc<dyn Log>,
    ));
    let ctx = Context::new(
        Arc::clone(log) as Arc<dyn Log>,
        ExecutionMode::from_dry_run(dry_run),
        executor,
        resolver,
        platform,
        engine::home_dir()?,
    );
    watch_interrupt(&ctx, log);

    let results = engine::run(&document, &ctx);
    log.debug(&format!("processed {} application(s)", results.len()));
    finish(log, dry_run)
}

/// Load the document at `opts.config` and substitute `--set` placeholders.
///
/// Unresolved placeholders are left in place and reported as warnings.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or an assignment is
/// malformed.
pub fn prepare(opts: &ApplyOpts, log: &dyn Log) -> Result<ConfigurationDocument> {
    log.stage("Loading configuration");
    let placeholders = Placeholders::from_assignments(opts.set.as_slice())?;
    let document = config::load(&opts.config)?;

    let (document, unresolved) = placeholders.apply(document);
    for name in &unresolved {
        log.warn(&format!("no value for placeholder '{{{{{name}}}}}' (use --set {name}=...)"));
    }

    log.info(&format!(
        "loaded {} application(s) from {}",
        document.len(),
        opts.config.display()
    ));
    Ok(document)
}

/// Print the summary and derive the overall status from the recorded
/// applications.
///
/// # Errors
///
/// Returns an error carrying the failure count if any application failed.
pub fn finish(log: &Logger, dry_run: bool) -> Result<()> {
    log.print_summary(dry_run);

    let failed = log.failure_count();
    if failed > 0 {
        anyhow::bail!("{failed} application(s) failed");
    }

    if dry_run {
        log.info("dry run complete; no changes were made");
    } else {
        log.info("configuration applied");
    }
    Ok(())
}

/// Stop before the next application on Ctrl-C; the one in flight completes.
fn watch_interrupt(ctx: &Context, log: &Logger) {
    let flag = ctx.cancel_flag();
    let installed = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing Ctrl-C handler");
    if let Err(e) = installed {
        log.debug(&format!("{e:#}"));
    }
}
