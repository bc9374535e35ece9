//! Locates and loads the deploy-audit configuration.
//!
//! An explicit `--config` path always wins and must exist. Otherwise the
//! first existing file among these candidates is loaded:
//!
//! 1. `<root>/deploy-audit.toml`
//! 2. `<root>/.deploy-audit.toml`
//! 3. `$DEPLOY_AUDIT_CONFIG_DIR/config.toml`, or `~/.deploy-audit/config.toml`
//!
//! With no candidate present the built-in defaults apply.

use anyhow::{Context, Result};
use deploy_audit_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file names looked up in the project root, in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["deploy-audit.toml", ".deploy-audit.toml"];

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "DEPLOY_AUDIT_CONFIG_DIR";

/// How the active configuration was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// `--config` on the command line.
    Flag,
    /// A config file in the project root.
    Project,
    /// The per-user config file.
    Global,
    /// No file; built-in defaults.
    BuiltIn,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "command line",
            Self::Project => "project",
            Self::Global => "global",
            Self::BuiltIn => "built-in defaults",
        })
    }
}

/// A configuration together with where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: Config,
    /// How it was chosen.
    pub origin: Origin,
    /// The file it was read from, unless built in.
    pub path: Option<PathBuf>,
}

/// Loads the configuration for an audit of `root`.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed, including a
/// missing `--config` file.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_with(root, explicit, global_dir().as_deref())
}

fn load_with(root: &Path, explicit: Option<&Path>, global: Option<&Path>) -> Result<LoadedConfig> {
    let chosen = match explicit {
        Some(path) => Some((Origin::Flag, path.to_path_buf())),
        None => candidates(root, global)
            .into_iter()
            .find(|(_, path)| path.is_file()),
    };

    let Some((origin, path)) = chosen else {
        tracing::debug!("No config file found, using defaults");
        return Ok(LoadedConfig {
            config: Config::default(),
            origin: Origin::BuiltIn,
            path: None,
        });
    };

    tracing::debug!("Loading {origin} config: {}", path.display());
    let config = Config::from_file(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;

    Ok(LoadedConfig {
        config,
        origin,
        path: Some(path),
    })
}

fn candidates(root: &Path, global: Option<&Path>) -> Vec<(Origin, PathBuf)> {
    PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| (Origin::Project, root.join(name)))
        .chain(global.map(|dir| (Origin::Global, dir.join("config.toml"))))
        .collect()
}

fn global_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".deploy-audit")))
}
