//! Core logging types: per-application entries, status, and the [`Log`] trait.

/// Application result for summary reporting.
#[derive(Debug, Clone)]
pub struct AppEntry {
    /// Application name as written in the document.
    pub name: String,
    /// Final status of the application.
    pub status: AppStatus,
    /// Optional detail message (e.g. failure reason).
    pub message: Option<String>,
}

/// Status of a processed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// At least one setting was changed (or would be, in dry-run).
    Applied,
    /// Every setting already matched.
    Skipped,
    /// No handler is registered for the application.
    Unsupported,
    /// Dependency resolution, a setting, or the handler itself failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// Engine and handler code log through this trait so tests can substitute a
/// recording implementation.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an application result for the summary.
    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>);
}
