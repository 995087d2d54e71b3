//! Layered configuration.
//!
//! Precedence, lowest first:
//!
//! 1. Built-in defaults
//! 2. YAML config file (`--config` or `DEPWHY_CONFIG`)
//! 3. Environment (`DEPWHY_DELIMITER`, `DEPWHY_LIMIT`, `NO_COLOR`)
//! 4. Command-line flags, applied by the binary through the `with_*` setters
//!
//! ```yaml
//! delimiter: "\t"
//! limit: 3
//! comment: "//"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::hierarchy::PATH_SEPARATOR;
use crate::ingest::EdgeFormat;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "DEPWHY_CONFIG";

/// Default number of paths per query.
pub const DEFAULT_LIMIT: usize = 1;

/// On-disk configuration; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    delimiter: Option<String>,
    limit: Option<usize>,
    comment: Option<String>,
}

/// Effective configuration for loading and querying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How edge lines are split.
    pub format: EdgeFormat,
    /// Number of paths requested per query.
    pub limit: usize,
    /// Whether text output is colored.
    pub use_colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: EdgeFormat::default(),
            limit: DEFAULT_LIMIT,
            use_colors: true,
        }
    }
}

impl Config {
    /// Build the configuration from defaults, an optional file and the
    /// process environment.
    ///
    /// `path` wins over `DEPWHY_CONFIG`; with neither, no file is read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Read a YAML config file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading config file");
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse YAML configuration on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML, unknown keys or invalid
    /// values.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?
        };

        let mut config = Self::default();
        if let Some(delimiter) = file.delimiter {
            config = config.with_delimiter(parse_delimiter(&delimiter)?)?;
        }
        if let Some(limit) = file.limit {
            config = config.with_limit(limit)?;
        }
        if let Some(comment) = file.comment {
            config.format.comment_prefix = (!comment.is_empty()).then_some(comment);
        }
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Invalid values are logged and ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("DEPWHY_DELIMITER") {
            match parse_delimiter(&value).ok() {
                Some(delimiter) => self.format.delimiter = delimiter,
                None => warn!(
                    env_var = "DEPWHY_DELIMITER",
                    value = %value,
                    "Invalid value, using {:?}",
                    self.format.delimiter
                ),
            }
        }

        if let Some(value) = lookup("DEPWHY_LIMIT") {
            match value.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => self.limit = limit,
                _ => warn!(
                    env_var = "DEPWHY_LIMIT",
                    value = %value,
                    default = self.limit,
                    "Invalid value, using default"
                ),
            }
        }

        // https://no-color.org/
        if lookup("NO_COLOR").is_some() {
            self.use_colors = false;
        }
    }

    /// Override the field delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for the path separator or a line break.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        self.format.delimiter = validate_delimiter(delimiter)?;
        Ok(self)
    }

    /// Override the number of paths per query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `limit` is zero.
    pub fn with_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::Config("limit must be at least 1".to_string()));
        }
        self.limit = limit;
        Ok(self)
    }

    /// Disable colored output.
    #[must_use]
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }
}

/// Parse a delimiter setting: one character, or `tab` / `\t` for a tab.
///
/// Shared by the config file, the environment and the command line.
///
/// # Errors
///
/// Returns [`Error::Config`] for an empty or multi-character value, the path
/// separator, or a line break.
pub fn parse_delimiter(value: &str) -> Result<char> {
    if value == "tab" || value == "\\t" {
        return Ok('\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => validate_delimiter(c),
        (None, _) => Err(Error::Config("delimiter cannot be empty".to_string())),
        (Some(_), Some(_)) => Err(Error::Config(format!(
            "delimiter must be a single character, got '{value}'"
        ))),
    }
}

fn validate_delimiter(delimiter: char) -> Result<char> {
    if delimiter == PATH_SEPARATOR {
        return Err(Error::Config(format!(
            "'{PATH_SEPARATOR}' separates name segments and cannot be a field delimiter"
        )));
    }
    if delimiter == '\n' || delimiter == '\r' {
        return Err(Error::Config(format!(
            "{delimiter:?} cannot be used as a field delimiter"
        )));
    }
    Ok(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.format.delimiter, ',');
        assert_eq!(config.format.comment_prefix.as_deref(), Some("#"));
        assert_eq!(config.limit, 1);
        assert!(config.use_colors);
    }

    #[test]
    fn yaml_overrides_defaults() {
        let config = Config::from_yaml("delimiter: \"\\t\"\nlimit: 4\ncomment: \"//\"\n")
            .expect("config should parse");

        assert_eq!(config.format.delimiter, '\t');
        assert_eq!(config.limit, 4);
        assert_eq!(config.format.comment_prefix.as_deref(), Some("//"));
    }

    #[test]
    fn empty_comment_disables_comments() {
        let config = Config::from_yaml("comment: \"\"").expect("config should parse");

        assert_eq!(config.format.comment_prefix, None);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[rstest]
    #[case::unknown_key("colour: red", "unknown field")]
    #[case::zero_limit("limit: 0", "at least 1")]
    #[case::dot_delimiter("delimiter: \".\"", "delimiter")]
    #[case::long_delimiter("delimiter: \"ab\"", "single character")]
    #[case::empty_delimiter("delimiter: \"\"", "cannot be empty")]
    fn invalid_yaml_is_a_config_error(#[case] yaml: &str, #[case] expected: &str) {
        let err = Config::from_yaml(yaml).expect_err("config should be rejected");

        assert!(matches!(err, Error::Config(_)));
        assert!(
            err.to_string().contains(expected),
            "Expected error to contain '{expected}', got: '{err}'"
        );
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config.apply_env(env_from(&[
            ("DEPWHY_DELIMITER", ";"),
            ("DEPWHY_LIMIT", "5"),
            ("NO_COLOR", "1"),
        ]));

        assert_eq!(config.format.delimiter, ';');
        assert_eq!(config.limit, 5);
        assert!(!config.use_colors);
    }

    #[rstest]
    #[case::zero_limit("DEPWHY_LIMIT", "0")]
    #[case::text_limit("DEPWHY_LIMIT", "many")]
    #[case::dot_delimiter("DEPWHY_DELIMITER", ".")]
    #[case::long_delimiter("DEPWHY_DELIMITER", ",,")]
    fn invalid_env_values_are_ignored(#[case] key: &str, #[case] value: &str) {
        let mut config = Config::default();
        config.apply_env(env_from(&[(key, value)]));

        assert_eq!(config, Config::default());
    }

    #[rstest]
    #[case::yaml_tab_name(Config::from_yaml("delimiter: tab").unwrap())]
    #[case::yaml_tab_escape(Config::from_yaml("delimiter: '\\t'").unwrap())]
    #[case::env_tab_name(with_env(&[("DEPWHY_DELIMITER", "tab")]))]
    #[case::env_tab_escape(with_env(&[("DEPWHY_DELIMITER", "\\t")]))]
    #[case::env_literal_tab(with_env(&[("DEPWHY_DELIMITER", "\t")]))]
    fn tab_alias_is_accepted_by_every_layer(#[case] config: Config) {
        assert_eq!(config.format.delimiter, '\t');
    }

    fn with_env(pairs: &[(&str, &str)]) -> Config {
        let mut config = Config::default();
        config.apply_env(env_from(pairs));
        config
    }

    #[test]
    fn setters_validate() {
        assert!(Config::default().with_limit(0).is_err());
        assert!(Config::default().with_delimiter('.').is_err());
        assert_eq!(
            Config::default().with_delimiter(' ').unwrap().format.delimiter,
            ' '
        );
        assert!(!Config::default().without_colors().use_colors);
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("depwhy.yaml");
        fs::write(&path, "limit: 2\n").expect("should write config");

        let config = Config::load(Some(&path)).expect("config should load");

        assert_eq!(config.limit, 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(Path::new("/no/such/depwhy.yaml")).expect_err("missing");

        assert!(matches!(err, Error::Io(_)));
    }
}
