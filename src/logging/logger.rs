//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{AppEntry, AppStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// `record_app` is not included because its signature differs from the
/// `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Every message also reaches the persistent log file at
/// `$XDG_CACHE_HOME/appconf/<command>.log` through the
/// [`FileLayer`](super::subscriber::FileLayer), regardless of the verbose
/// flag.
#[derive(Debug)]
pub struct Logger {
    apps: Mutex<Vec<AppEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            apps: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded application entries.
    #[must_use]
    pub fn app_entries(&self) -> Vec<AppEntry> {
        self.apps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an application result for the summary.
    pub fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.apps.lock() {
            guard.push(AppEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed applications.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.apps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|a| a.status == AppStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded applications.
    ///
    /// In dry-run mode `Applied` entries are labelled "would apply".
    pub fn print_summary(&self, dry_run: bool) {
        let apps = self.app_entries();
        if apps.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut applied = 0u32;
        let mut skipped = 0u32;
        let mut unsupported = 0u32;
        let mut failed = 0u32;

        for app in &apps {
            let (icon, color) = match app.status {
                AppStatus::Applied => {
                    applied += 1;
                    (if dry_run { "~" } else { "✓" }, "\x1b[32m")
                }
                AppStatus::Skipped => {
                    skipped += 1;
                    ("·", "\x1b[2m")
                }
                AppStatus::Unsupported => {
                    unsupported += 1;
                    ("?", "\x1b[33m")
                }
                AppStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = app
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", app.name));
        }

        let applied_label = if dry_run { "would apply" } else { "applied" };
        let total = applied + skipped + unsupported + failed;
        self.info(&format!(
            "{total} applications: \x1b[32m{applied} {applied_label}\x1b[0m, \x1b[2m{skipped} skipped\x1b[0m, \x1b[33m{unsupported} unsupported\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        self.record_app(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new_is_empty() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.app_entries().is_empty());
    }

    #[test]
    fn record_app_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_app("git", AppStatus::Failed, Some("exit 128"));
        let apps = log.app_entries();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "git");
        assert_eq!(apps[0].status, AppStatus::Failed);
        assert_eq!(apps[0].message, Some("exit 128".to_string()));
    }

    #[test]
    fn failure_count_ignores_unsupported() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_app("git", AppStatus::Applied, None);
        log.record_app("foobar", AppStatus::Unsupported, None);
        assert_eq!(log.failure_count(), 0);
        log.record_app("npm", AppStatus::Failed, Some("a"));
        log.record_app("office", AppStatus::Failed, Some("b"));
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_app("via-trait", AppStatus::Skipped, None);
        assert_eq!(log.app_entries().len(), 1);
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists());
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains(&format!("[debug] {marker}")));
    }

    #[test]
    fn stage_and_dry_run_are_tagged_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Applying git");
        log.dry_run("would set user.name");
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("==> Applying git"));
        assert!(contents.contains("[dry run] would set user.name"));
    }

    #[test]
    fn warn_and_error_are_tagged_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("terminal settings not found");
        log.error("installer failed");
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("[warn] terminal settings not found"));
        assert!(contents.contains("[error] installer failed"));
    }

    #[test]
    fn summary_is_written_without_ansi_codes() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_app("git", AppStatus::Applied, None);
        log.record_app("foobar", AppStatus::Unsupported, None);
        log.record_app("office", AppStatus::Failed, Some("setup.exe exited 17"));
        log.print_summary(false);

        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("==> Summary"));
        assert!(contents.contains("✗ office (setup.exe exited 17)"));
        assert!(contents.contains("3 applications: 1 applied, 0 skipped, 1 unsupported, 1 failed"));
        assert!(!contents.contains('\x1b'));
    }

    #[test]
    fn dry_run_summary_says_would_apply() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_app("git", AppStatus::Applied, None);
        log.print_summary(true);
        let contents = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(contents.contains("1 would apply"));
    }
}
