//! Command: print version information.
use crate::logging::Logger;

/// Version string: the release/`git describe` version when available.
#[must_use]
pub fn version() -> &'static str {
    option_env!("APPCONF_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Log the appconf version.
pub fn run(log: &Logger) {
    log.info(&format!("appconf {}", version()));
}
