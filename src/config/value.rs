//! Weakly-typed setting values with a stable, insertion-ordered map.
use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};

/// A single setting value as written in the configuration document.
///
/// Handlers interpret the shape they expect and report
/// [`SettingError::Shape`](crate::error::SettingError::Shape) otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Explicit `null` / `~`.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    String(String),
    /// Sequence of values.
    List(Vec<SettingValue>),
    /// Nested mapping.
    Map(Settings),
}

impl SettingValue {
    /// Short human-readable name of the value's shape.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Integer(_) => "an integer",
            Self::Float(_) => "a number",
            Self::String(_) => "a string",
            Self::List(_) => "a list",
            Self::Map(_) => "a map",
        }
    }

    /// Borrow the value as text if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render a scalar the way command-line config stores print it.
    ///
    /// Booleans become `true`/`false`, numbers their decimal form. Returns
    /// `None` for null, lists and maps.
    #[must_use]
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Rewrite every string reachable from this value.
    pub fn map_strings(&mut self, f: &mut impl FnMut(&str) -> String) {
        match self {
            Self::String(s) => *s = f(s),
            Self::List(items) => items.iter_mut().for_each(|v| v.map_strings(f)),
            Self::Map(map) => map.map_strings(f),
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) => {}
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Ordered mapping from setting key to value.
///
/// Keeps document order so that handlers process keys the way they were
/// written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: Vec<(String, SettingValue)>,
}

impl Settings {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up a key (exact match).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace a key, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite every string value (keys are left untouched).
    pub fn map_strings(&mut self, f: &mut impl FnMut(&str) -> String) {
        for (_, value) in &mut self.entries {
            value.map_strings(f);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, SettingValue)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, SettingValue)>>(iter: I) -> Self {
        let mut settings = Self::new();
        for (k, v) in iter {
            settings.insert(k, v);
        }
        settings
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingsVisitor;

        impl<'de> Visitor<'de> for SettingsVisitor {
            type Value = Settings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of setting keys to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Settings, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, SettingValue>()? {
                    if entries.iter().any(|(k, _): &(String, SettingValue)| *k == key) {
                        return Err(de::Error::custom(format!("duplicate setting key '{key}'")));
                    }
                    entries.push((key, value));
                }
                Ok(Settings { entries })
            }

            fn visit_unit<E: de::Error>(self) -> Result<Settings, E> {
                Ok(Settings::new())
            }
        }

        deserializer.deserialize_map(SettingsVisitor)
    }
}
