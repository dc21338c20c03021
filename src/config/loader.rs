//! Read a configuration document from disk in YAML, JSON or TOML form.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::ConfigurationDocument;
use crate::error::ConfigError;

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl Format {
    /// Infer the format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse a document held in memory.
///
/// # Errors
///
/// Returns an error if `content` is not valid in `format` or lacks the
/// `apps` mapping.
pub fn parse_str(content: &str, format: Format) -> Result<ConfigurationDocument> {
    match format {
        Format::Yaml => serde_yaml::from_str(content).context("parsing YAML"),
        Format::Json => serde_json::from_str(content).context("parsing JSON"),
        Format::Toml => toml::from_str(content).context("parsing TOML"),
    }
}

/// Load the document at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist,
/// [`ConfigError::UnsupportedFormat`] for an unknown extension,
/// [`ConfigError::Io`] if it cannot be read and [`ConfigError::Parse`] if it
/// cannot be parsed.
pub fn load(path: &Path) -> Result<ConfigurationDocument, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_str(&content, format).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::write_temp;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("a.ini")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[test]
    fn load_yaml_file() {
        let (_dir, path) = write_temp(
            "apps.yaml",
            "apps:\n  git:\n    command: git\n    source: Git.Git\n    config:\n      user.name: Bob\n",
        );
        let doc = load(&path).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn load_json_file() {
        let (_dir, path) = write_temp(
            "apps.json",
            r#"{"apps": {"git": {"command": "git", "source": "Git.Git", "config": {"user.name": "Bob"}}}}"#,
        );
        let doc = load(&path).unwrap();
        assert_eq!(
            doc.get("git").unwrap().settings.get("user.name"),
            Some(&crate::config::SettingValue::from("Bob"))
        );
    }

    #[test]
    fn load_toml_file() {
        let (_dir, path) = write_temp(
            "apps.toml",
            "[apps.git]\ncommand = \"git\"\nsource = \"Git.Git\"\n\n[apps.git.config]\n\"user.name\" = \"Bob\"\n",
        );
        let doc = load(&path).unwrap();
        assert_eq!(doc.get("git").unwrap().command, "git");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let err = load(&PathBuf::from("/definitely/not/here/apps.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }), "{err}");
    }

    #[test]
    fn load_unknown_extension_is_rejected() {
        let (_dir, path) = write_temp("apps.ini", "[apps]\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }), "{err}");
    }

    #[test]
    fn load_malformed_document_is_parse_error() {
        let (_dir, path) = write_temp("apps.yaml", "apps: [unterminated\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }
}
