//! Configuration management for Yokedox.
//!
//! Parses `yokedox.toml` with serde and discovers the file in the current
//! directory or its parents. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ```toml
//! [output]
//! directory = "site"
//! markdown = true
//! mdast_json = false
//! rst = true
//!
//! [entities]
//! duplicate_warning = true
//!
//! [[external_entities]]
//! from = "^java\\."
//! to_prefix = "https://docs.oracle.com/javase/8/docs/api/"
//! to_suffix = ".html"
//! ```
//!
//! `output.directory` and `external_entities.to_prefix` support `${VAR}` and
//! `${VAR:-default}` environment variable expansion.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override Markdown output flag.
    pub markdown: Option<bool>,
    /// Override mdast JSON output flag.
    pub mdast_json: Option<bool>,
    /// Override reStructuredText output flag.
    pub rst: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "yokedox.toml";

/// Default output directory, relative to the config file.
const DEFAULT_OUTPUT_DIR: &str = "docs-out";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Entity registry behaviour.
    pub entities: EntitiesConfig,
    /// Canonical name patterns linked to external documentation sites.
    pub external_entities: Vec<ExternalEntityConfig>,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    directory: Option<String>,
    markdown: Option<bool>,
    mdast_json: Option<bool>,
    rst: Option<bool>,
}

/// Resolved output configuration with an absolute directory.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Root directory pages are written under.
    pub directory: PathBuf,
    /// Write `<page>.md` files.
    pub markdown: bool,
    /// Write `<page>.json` files containing the serialized tree.
    pub mdast_json: bool,
    /// Write `<page>.rst` files.
    pub rst: bool,
}

/// Entity registry configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EntitiesConfig {
    /// Log duplicate entity declarations as warnings (debug level otherwise).
    pub duplicate_warning: bool,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            duplicate_warning: true,
        }
    }
}

/// Maps canonical names matching a pattern to an external documentation URL.
///
/// The URL is `to_prefix`, then the canonical name with every `.` replaced
/// by `/`, then `to_suffix`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ExternalEntityConfig {
    /// Regular expression matched against canonical names.
    pub from: String,
    /// URL prefix.
    pub to_prefix: String,
    /// Optional URL suffix (e.g. `.html`).
    #[serde(default)]
    pub to_suffix: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.directory`").
        field: String,
        /// Error message (e.g., "${`OUT_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `yokedox.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.directory.clone_from(dir);
        }
        if let Some(markdown) = settings.markdown {
            self.output_resolved.markdown = markdown;
        }
        if let Some(mdast_json) = settings.mdast_json {
            self.output_resolved.mdast_json = mdast_json;
        }
        if let Some(rst) = settings.rst {
            self.output_resolved.rst = rst;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no output format is enabled or an
    /// external entity pattern is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = &self.output_resolved;
        if !(output.markdown || output.mdast_json || output.rst) {
            return Err(ConfigError::Validation(
                "at least one of output.markdown, output.mdast_json or output.rst must be enabled"
                    .to_owned(),
            ));
        }

        for (i, pattern) in self.external_entities.iter().enumerate() {
            if let Err(e) = regex::Regex::new(&pattern.from) {
                return Err(ConfigError::Validation(format!(
                    "external_entities[{i}].from is not a valid regex: {e}"
                )));
            }
            if pattern.to_prefix.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "external_entities[{i}].to_prefix cannot be empty"
                )));
            }
        }

        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            entities: EntitiesConfig::default(),
            external_entities: Vec::new(),
            output_resolved: OutputConfig {
                directory: base.join(DEFAULT_OUTPUT_DIR),
                markdown: true,
                mdast_json: false,
                rst: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.output.directory {
            self.output.directory = Some(expand::expand_env(dir, "output.directory")?);
        }
        for (i, pattern) in self.external_entities.iter_mut().enumerate() {
            pattern.to_prefix = expand::expand_env(
                &pattern.to_prefix,
                &format!("external_entities[{i}].to_prefix"),
            )?;
        }
        Ok(())
    }

    /// Resolve the output directory relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved = OutputConfig {
            directory: config_dir.join(
                self.output
                    .directory
                    .as_deref()
                    .unwrap_or(DEFAULT_OUTPUT_DIR),
            ),
            markdown: self.output.markdown.unwrap_or(true),
            mdast_json: self.output.mdast_json.unwrap_or(false),
            rst: self.output.rst.unwrap_or(false),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.output_resolved.directory,
            PathBuf::from("/test/docs-out")
        );
        assert!(config.output_resolved.markdown);
        assert!(!config.output_resolved.mdast_json);
        assert!(!config.output_resolved.rst);
        assert!(config.entities.duplicate_warning);
        assert!(config.external_entities.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.output_resolved.directory,
            PathBuf::from("/project/docs-out")
        );
        assert!(config.output_resolved.markdown);
    }

    #[test]
    fn test_parse_output_config() {
        let toml = r#"
[output]
directory = "site/api"
markdown = false
mdast_json = true
rst = true
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.output_resolved.directory,
            PathBuf::from("/project/site/api")
        );
        assert!(!config.output_resolved.markdown);
        assert!(config.output_resolved.mdast_json);
        assert!(config.output_resolved.rst);
    }

    #[test]
    fn test_parse_external_entities() {
        let toml = r#"
[[external_entities]]
from = "^java\\."
to_prefix = "https://docs.oracle.com/javase/8/docs/api/"
to_suffix = ".html"

[[external_entities]]
from = "^org\\.example\\."
to_prefix = "https://example.org/api/"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.external_entities,
            vec![
                ExternalEntityConfig {
                    from: "^java\\.".to_owned(),
                    to_prefix: "https://docs.oracle.com/javase/8/docs/api/".to_owned(),
                    to_suffix: Some(".html".to_owned()),
                },
                ExternalEntityConfig {
                    from: "^org\\.example\\.".to_owned(),
                    to_prefix: "https://example.org/api/".to_owned(),
                    to_suffix: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_entities_config() {
        let config: Config = toml::from_str("[entities]\nduplicate_warning = false\n").unwrap();
        assert!(!config.entities.duplicate_warning);
    }

    #[test]
    fn test_validate_requires_an_output_format() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            markdown: Some(false),
            ..Default::default()
        });

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("output.markdown"));
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.external_entities.push(ExternalEntityConfig {
            from: "(unclosed".to_owned(),
            to_prefix: "https://example.org/".to_owned(),
            to_suffix: None,
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("external_entities[0].from"));
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.external_entities.push(ExternalEntityConfig {
            from: "^java\\.".to_owned(),
            to_prefix: String::new(),
            to_suffix: None,
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("to_prefix cannot be empty"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::from("/custom/out")),
            rst: Some(true),
            ..Default::default()
        });

        assert_eq!(config.output_resolved.directory, PathBuf::from("/custom/out"));
        assert!(config.output_resolved.rst);
        assert!(config.output_resolved.markdown); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/yokedox.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndirectory = \"out\"\nrst = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.output_resolved.directory, dir.path().join("out"));
        assert!(config.output_resolved.rst);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
