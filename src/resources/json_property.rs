//! A nested property inside a JSON settings file (e.g. Windows Terminal's
//! `profiles.defaults.font.face`).
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::error::ResourceError;
use super::fs::{read_optional, replace_contents};
use super::{Resource, ResourceChange, ResourceState};

/// Split a dotted key path (`profiles.defaults.font.face`) into segments.
///
/// Empty segments are dropped.
#[must_use]
pub fn parse_key_path(dotted: &str) -> Vec<String> {
    dotted
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Follow `path` through nested objects.
#[must_use]
pub fn get_path<'v>(root: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter()
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Set `path` to `value`, creating intermediate objects as needed.
///
/// Existing keys keep their position; new keys are appended to their parent
/// object.
///
/// # Errors
///
/// Returns the offending segment if the root or an intermediate value exists
/// but is not an object, or if `path` is empty.
pub fn set_path(root: &mut Value, path: &[String], value: Value) -> Result<(), String> {
    let Some((last, parents)) = path.split_last() else {
        return Err("empty key path".to_string());
    };

    let mut node = root;
    for segment in parents {
        let object = node
            .as_object_mut()
            .ok_or_else(|| format!("parent of '{segment}' is not an object"))?;
        node = object
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let object = node
        .as_object_mut()
        .ok_or_else(|| format!("parent of '{last}' is not an object"))?;
    object.insert(last.clone(), value);
    Ok(())
}

/// Text layout of a JSON file, reused when the file is written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Indent unit; `None` for a single-line document.
    pub indent: Option<String>,
    /// Lines end in `\r\n` rather than `\n`.
    pub crlf: bool,
    /// The text ends with a line terminator.
    pub trailing_newline: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            indent: Some("  ".to_string()),
            crlf: false,
            trailing_newline: true,
        }
    }
}

impl Layout {
    /// Infer the layout of `content` from its first indented line.
    ///
    /// A multi-line document with no indented line keeps the two-space
    /// default.
    #[must_use]
    pub fn detect(content: &str) -> Self {
        let body = content.trim_end();
        let indent = body.contains('\n').then(|| {
            body.lines()
                .skip(1)
                .filter_map(|line| line.strip_suffix(line.trim_start_matches([' ', '\t'])))
                .find(|lead| !lead.is_empty())
                .unwrap_or("  ")
                .to_string()
        });

        Self {
            indent,
            crlf: content.contains("\r\n"),
            trailing_newline: content.ends_with('\n'),
        }
    }
}

/// Render a document the way it is written back to disk, following `layout`.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn render(document: &Value, layout: &Layout) -> Result<String> {
    let mut out = match &layout.indent {
        Some(indent) => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            document
                .serialize(&mut serializer)
                .context("serializing JSON")?;
            String::from_utf8(buf).context("serialized JSON is not UTF-8")?
        }
        None => serde_json::to_string(document).context("serializing JSON")?,
    };
    if layout.trailing_newline {
        out.push('\n');
    }
    if layout.crlf {
        out = out.replace('\n', "\r\n");
    }
    Ok(out)
}

/// A JSON property that must hold a specific value.
///
/// The file itself is never created: if it is absent the resource is
/// [`ResourceState::Invalid`].
#[derive(Debug, Clone)]
pub struct JsonPropertyResource {
    /// JSON file path.
    pub path: PathBuf,
    /// Key path segments from the document root.
    pub key_path: Vec<String>,
    /// Desired value.
    pub desired: Value,
}

impl JsonPropertyResource {
    /// Create a new JSON property resource from a dotted key path.
    #[must_use]
    pub fn new(path: PathBuf, dotted_key: &str, desired: Value) -> Self {
        Self {
            path,
            key_path: parse_key_path(dotted_key),
            desired,
        }
    }

    fn load(&self) -> Result<Option<(Value, Layout)>> {
        let Some(content) = read_optional(&self.path)? else {
            return Ok(None);
        };
        let document: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some((document, Layout::detect(&content))))
    }
}

impl Resource for JsonPropertyResource {
    fn description(&self) -> String {
        format!(
            "{} {} = {}",
            self.path.display(),
            self.key_path.join("."),
            self.desired
        )
    }

    fn current_state(&self) -> Result<ResourceState> {
        let Some((document, _)) = self.load()? else {
            return Ok(ResourceState::Invalid {
                reason: format!("{} not found", self.path.display()),
            });
        };

        match get_path(&document, &self.key_path) {
            None => Ok(ResourceState::Missing),
            Some(current) if *current == self.desired => Ok(ResourceState::Correct),
            Some(current) => Ok(ResourceState::Incorrect {
                current: current.to_string(),
            }),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let (mut document, layout) =
            self.load()?.ok_or_else(|| ResourceError::NotFound {
                resource: self.path.display().to_string(),
            })?;

        if get_path(&document, &self.key_path) == Some(&self.desired) {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        set_path(&mut document, &self.key_path, self.desired.clone()).map_err(|reason| {
            ResourceError::InvalidState {
                resource: self.path.display().to_string(),
                reason,
            }
        })?;

        replace_contents(&self.path, &render(&document, &layout)?)?;
        Ok(ResourceChange::Applied)
    }
}
