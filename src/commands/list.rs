//! Command: list the supported application handlers.
use crate::handlers::registry;
use crate::logging::Logger;

/// Log every canonical handler name, one per line.
pub fn run(log: &Logger) {
    for name in registry::supported() {
        log.info(name);
    }
}
