//! Configuration types for dj-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for dj-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-message configurations, keyed by message name (e.g. `no-pk`).
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,

    /// DataJoint-specific checker settings.
    #[serde(default)]
    pub datajoint: DataJointConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// A file named `pyproject.toml` is read through its `[tool.dj-lint]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if path.file_name().is_some_and(|n| n == "pyproject.toml") {
            return Self::from_pyproject(&content)?.ok_or(ConfigError::MissingTable);
        }
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Extracts the `[tool.dj-lint]` table of a `pyproject.toml`.
    ///
    /// Returns `Ok(None)` when the project has no such table.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_pyproject(content: &str) -> Result<Option<Self>, ConfigError> {
        #[derive(Deserialize)]
        struct PyProject {
            #[serde(default)]
            tool: HashMap<String, toml::Value>,
        }

        let project: PyProject = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        project
            .tool
            .get("dj-lint")
            .cloned()
            .map(|table| {
                table.try_into().map_err(|e: toml::de::Error| ConfigError::Parse {
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Checks if a message is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a message.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Abort the run on the first file that is not valid Python.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec![
        "**/.venv/**".to_string(),
        "**/venv/**".to_string(),
        "**/__pycache__/**".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

/// Per-message configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this message is reported.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this message.
    #[serde(default)]
    pub severity: Option<crate::Severity>,
}

/// How `null-pk-ref` relates to invalid foreign key options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullPkRefMode {
    /// Check once, after all options were examined.
    #[default]
    AfterOptions,
    /// Check per option token; an invalid token never triggers it.
    PerOption,
}

/// Settings of the DataJoint table definition checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataJointConfig {
    /// Accept `filepath@store` attributes instead of reporting `no-fp`.
    #[serde(default)]
    pub permit_filepath: bool,

    /// Module names under which table base classes are recognized (`dj.Manual`).
    #[serde(default = "default_module_aliases")]
    pub module_aliases: Vec<String>,

    /// Additional base class names treated as tables (e.g. `_Merge`).
    #[serde(default = "default_extension_bases")]
    pub extension_bases: Vec<String>,

    /// Interaction of `null-pk-ref` with `bad-opt`.
    #[serde(default)]
    pub null_pk_ref: NullPkRefMode,
}

impl Default for DataJointConfig {
    fn default() -> Self {
        Self {
            permit_filepath: false,
            module_aliases: default_module_aliases(),
            extension_bases: default_extension_bases(),
            null_pk_ref: NullPkRefMode::default(),
        }
    }
}

fn default_module_aliases() -> Vec<String> {
    vec!["dj".to_string(), "datajoint".to_string()]
}

fn default_extension_bases() -> Vec<String> {
    vec!["_Merge".to_string()]
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A `pyproject.toml` was given that has no `[tool.dj-lint]` table.
    #[error("pyproject.toml has no [tool.dj-lint] table")]
    MissingTable,
}
