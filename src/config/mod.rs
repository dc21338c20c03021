//! Configuration document model and loading.
//!
//! A document declares applications under a top-level `apps` key:
//!
//! ```yaml
//! apps:
//!   git:
//!     command: git
//!     source: Git.Git
//!     config:
//!       user.name: "{{name}}"
//! ```
pub mod loader;
pub mod placeholders;
pub mod value;

use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};

pub use loader::{Format, load, parse_str};
pub use placeholders::Placeholders;
pub use value::{SettingValue, Settings};

/// Declared state of one application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplicationSpec {
    /// Executable / logical name used for dependency resolution.
    #[serde(default)]
    pub command: String,
    /// Installation source identifier (e.g. a winget package id).
    #[serde(default)]
    pub source: String,
    /// Handler-specific settings.
    #[serde(default, rename = "config")]
    pub settings: Settings,
}

/// The loaded configuration document.
///
/// Applications keep document order; names are unique ignoring case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationDocument {
    apps: Vec<(String, ApplicationSpec)>,
}

impl ConfigurationDocument {
    /// Iterate applications in document order.
    pub fn apps(&self) -> impl Iterator<Item = (&str, &ApplicationSpec)> {
        self.apps.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Look up an application by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ApplicationSpec> {
        self.apps
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, spec)| spec)
    }

    /// Number of declared applications.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.apps.len()
    }

    /// Whether no applications are declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl<'de> Deserialize<'de> for ConfigurationDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            apps: AppList,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self { apps: raw.apps.0 })
    }
}

/// Ordered `apps` mapping with case-insensitive duplicate detection.
struct AppList(Vec<(String, ApplicationSpec)>);

impl<'de> Deserialize<'de> for AppList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AppListVisitor;

        impl<'de> Visitor<'de> for AppListVisitor {
            type Value = AppList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of application names to application specs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AppList, A::Error> {
                let mut apps: Vec<(String, ApplicationSpec)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, spec)) = access.next_entry::<String, ApplicationSpec>()? {
                    if apps.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                        return Err(de::Error::custom(format!(
                            "application '{name}' is declared more than once"
                        )));
                    }
                    apps.push((name, spec));
                }
                Ok(AppList(apps))
            }

            fn visit_unit<E: de::Error>(self) -> Result<AppList, E> {
                Ok(AppList(Vec::new()))
            }
        }

        deserializer.deserialize_map(AppListVisitor)
    }
}

/// Shared fixtures for config unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::path::PathBuf;

    /// Write `content` to `name` inside a fresh temporary directory.
    #[allow(clippy::expect_used)]
    pub fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write temp config");
        (dir, path)
    }
}
