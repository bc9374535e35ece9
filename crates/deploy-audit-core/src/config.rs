//! Configuration types for deploy-audit.
//!
//! Every default reproduces the built-in target lists, so an absent config
//! file and an empty one behave the same.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Compose files checked by default, relative to the project root.
pub const DEFAULT_COMPOSE_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.prod.yml",
    "docker-compose.dev.yml",
    "docker-compose.monitoring.yml",
    "docker/docker-compose.optimized.yml",
];

/// Environment files scanned for secrets by default.
pub const DEFAULT_ENV_FILES: &[&str] = &[".env.production", ".env.dev", ".env.example"];

/// Auxiliary configuration files checked for presence by default.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["nginx/nginx.conf", "redis.conf", "redis.prod.conf"];

/// Placeholder credentials that must never reach production.
pub const DEFAULT_SECRET_TOKENS: &[&str] = &["CHANGE_ME", "password123", "admin123", "secret123"];

/// Default report location, relative to the project root.
pub const DEFAULT_OUTPUT: &str = "docker/analysis-results.json";

/// Top-level configuration for deploy-audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Files each phase looks at.
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Per-phase configurations keyed by phase name.
    #[serde(default)]
    pub phases: HashMap<String, PhaseConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
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

    /// Checks if a phase is enabled.
    #[must_use]
    pub fn is_phase_enabled(&self, phase_name: &str) -> bool {
        self.phases
            .get(phase_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Report path, relative to the project root unless absolute.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Glob patterns excluded from Dockerfile discovery.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            exclude: Vec::new(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

/// File lists consumed by the phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Compose file candidates.
    pub compose_files: Vec<String>,
    /// Environment files to scan.
    pub env_files: Vec<String>,
    /// Auxiliary config files to check.
    pub config_files: Vec<String>,
    /// Default secret tokens to look for.
    pub default_secrets: Vec<String>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            compose_files: to_owned(DEFAULT_COMPOSE_FILES),
            env_files: to_owned(DEFAULT_ENV_FILES),
            config_files: to_owned(DEFAULT_CONFIG_FILES),
            default_secrets: to_owned(DEFAULT_SECRET_TOKENS),
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Per-phase configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Whether this phase runs.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(deploy_audit::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(
        code(deploy_audit::config::parse),
        help("run `deploy-audit init --force` to regenerate a valid config")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },
}
