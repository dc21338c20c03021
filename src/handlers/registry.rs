//! The closed set of built-in handlers and name lookup.
use super::Handler;
use super::config_store::{GIT, NPM};
use super::office::OFFICE;
use super::oh_my_posh::OH_MY_POSH;

static HANDLERS: &[&dyn Handler] = &[&GIT, &NPM, &OH_MY_POSH, &OFFICE];

/// Find the handler for an application name, ignoring case.
///
/// Aliases are matched the same way as canonical names.
#[must_use]
pub fn resolve(name: &str) -> Option<&'static dyn Handler> {
    HANDLERS.iter().copied().find(|h| {
        h.name().eq_ignore_ascii_case(name)
            || h.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
    })
}

/// Canonical names of every built-in handler, in registration order.
#[must_use]
pub fn supported() -> Vec<&'static str> {
    HANDLERS.iter().map(|h| h.name()).collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_ignoring_case() {
        for name in ["git", "Git", "GIT"] {
            assert_eq!(resolve(name).map(|h| h.name()), Some("git"));
        }
        assert_eq!(resolve("NPM").map(|h| h.name()), Some("npm"));
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(resolve("ohmyposh").map(|h| h.name()), Some("oh-my-posh"));
        assert_eq!(resolve("Posh").map(|h| h.name()), Some("oh-my-posh"));
        assert_eq!(resolve("microsoft-office").map(|h| h.name()), Some("office"));
    }

    #[test]
    fn unknown_name_has_no_handler() {
        assert!(resolve("foobar").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn padded_name_does_not_match() {
        assert!(resolve(" git ").is_none());
        assert!(resolve("git\n").is_none());
    }

    #[test]
    fn names_and_aliases_are_unique() {
        let mut all: Vec<String> = HANDLERS
            .iter()
            .flat_map(|h| std::iter::once(h.name()).chain(h.aliases().iter().copied()))
            .map(str::to_ascii_lowercase)
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
