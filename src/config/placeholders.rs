//! `{{name}}` interpolation of user-specific values into setting strings.
use std::collections::BTreeMap;

use super::ConfigurationDocument;
use crate::error::ConfigError;

/// Values substituted for `{{name}}` tokens in setting strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    /// Parse `name=value` assignments (as given to `--set`).
    ///
    /// The value may itself contain `=`; only the first one splits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPlaceholder`] if an assignment has no
    /// `=` or an empty name.
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        for raw in assignments {
            let raw = raw.as_ref();
            let (name, value) = raw
                .split_once('=')
                .filter(|(name, _)| !name.trim().is_empty())
                .ok_or_else(|| ConfigError::InvalidPlaceholder(raw.to_string()))?;
            values.insert(name.trim().to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    /// Whether no values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every known `{{name}}` token in `input`.
    ///
    /// Whitespace inside the braces is ignored. Unknown tokens are left as
    /// written and their names pushed to `unresolved`.
    #[must_use]
    pub fn interpolate(&self, input: &str, unresolved: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some((before, tail)) = rest.split_once("{{") {
            out.push_str(before);
            let Some((token, after)) = tail.split_once("}}") else {
                out.push_str("{{");
                out.push_str(tail);
                return out;
            };
            let name = token.trim();
            if let Some(value) = self.values.get(name) {
                out.push_str(value);
            } else {
                if !unresolved.iter().any(|u| u == name) {
                    unresolved.push(name.to_string());
                }
                out.push_str("{{");
                out.push_str(token);
                out.push_str("}}");
            }
            rest = after;
        }
        out.push_str(rest);
        out
    }

    /// Substitute placeholders throughout a document.
    ///
    /// Returns the rewritten document and the names of tokens that had no
    /// value.
    #[must_use]
    pub fn apply(&self, mut document: ConfigurationDocument) -> (ConfigurationDocument, Vec<String>) {
        let mut unresolved = Vec::new();
        for (_, spec) in &mut document.apps {
            spec.settings
                .map_strings(&mut |s| self.interpolate(s, &mut unresolved));
        }
        (document, unresolved)
    }
}
