//! `feira.toml` configuration.
//!
//! Every key is optional; a missing file means all defaults.
//!
//! ```toml
//! namespace = "@FeiraApp"
//! language = "pt"            # or "en", report labels only
//!
//! [store]
//! backend = "sqlite"         # or "memory"
//! connection_string = "feira.db"
//!
//! [export]
//! cache_dir = "/tmp/feira"
//! share_dir = "relatorios"   # omit to disable sharing
//!
//! [logging]
//! file = "feira.log"
//! ```

use std::path::{Path, PathBuf};

use feira_core::{DEFAULT_NAMESPACE, ReportLabels, StoreConfig};
use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "feira.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{0}' not found")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn report_labels(self) -> ReportLabels {
        match self {
            Self::Pt => ReportLabels::portuguese(),
            Self::En => ReportLabels::english(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where report files are written before sharing.
    pub cache_dir: PathBuf,
    /// Outbox handed to the directory share target; `None` disables sharing.
    pub share_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("feira"),
            share_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeiraConfig {
    pub namespace: String,
    pub language: Language,
    pub store: StoreConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

impl Default for FeiraConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            language: Language::default(),
            store: StoreConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FeiraConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration.
    ///
    /// * `Some(path)`: the file must exist.
    /// * `None`: [`DEFAULT_CONFIG_FILE`] in the working directory if present,
    ///   defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        tracing::debug!(path = %path.display(), "reading config");
        let text = std::fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FeiraConfig::from_toml("").unwrap();

        assert_eq!(config, FeiraConfig::default());
        assert_eq!(config.namespace, "@FeiraApp");
        assert_eq!(config.store.backend, "sqlite");
        assert!(config.export.share_dir.is_none());
    }

    #[test]
    fn full_file_is_parsed() {
        let text = r#"
namespace = "@Test"
language = "en"

[store]
backend = "memory"
connection_string = ""

[export]
cache_dir = "/tmp/x"
share_dir = "out"

[logging]
file = "feira.log"
"#;
        let config = FeiraConfig::from_toml(text).unwrap();

        assert_eq!(config.namespace, "@Test");
        assert_eq!(config.language, Language::En);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.export.cache_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.export.share_dir, Some(PathBuf::from("out")));
        assert_eq!(config.logging.file, Some(PathBuf::from("feira.log")));
    }

    #[test]
    fn partial_store_section_keeps_other_defaults() {
        let config = FeiraConfig::from_toml("[store]\nconnection_string = \"other.db\"\n").unwrap();

        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.connection_string, "other.db");
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(matches!(
            FeiraConfig::from_toml("language = \"fr\""),
            Err(ConfigError::Deserialization(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = FeiraConfig::load(Some(Path::new("/definitely/not/here/feira.toml")));

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feira.toml");
        std::fs::write(&path, "namespace = \"@FromFile\"\n").unwrap();

        let config = FeiraConfig::load(Some(&path)).unwrap();

        assert_eq!(config.namespace, "@FromFile");
    }

    #[test]
    fn language_selects_report_labels() {
        assert_eq!(Language::Pt.report_labels(), ReportLabels::portuguese());
        assert_eq!(Language::En.report_labels(), ReportLabels::english());
    }
}
