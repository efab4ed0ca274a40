//! Configuration loading and discovery for `spritegroup.toml`
//!
//! Provides functions to find, load, and override configuration.

use super::schema::SpritegroupConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "spritegroup.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse spritegroup.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override build target
    pub target: Option<String>,
    /// Override tag prefix
    pub tag_prefix: Option<String>,
    /// Match the tag prefix ignoring case
    pub ignore_case: Option<bool>,
}

impl CliOverrides {
    /// Apply the overrides on top of a loaded configuration and re-validate.
    pub fn apply(&self, mut config: SpritegroupConfig) -> Result<SpritegroupConfig, ConfigError> {
        if let Some(target) = &self.target {
            config.build.target = target.clone();
        }
        if let Some(prefix) = &self.tag_prefix {
            config.policy.tag_prefix = prefix.clone();
        }
        if let Some(ignore_case) = self.ignore_case {
            config.policy.case_sensitive = !ignore_case;
        }
        check(config)
    }
}

/// Find spritegroup.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for spritegroup.toml
/// 2. Check XDG_CONFIG_HOME/spritegroup/spritegroup.toml (or ~/.config/spritegroup/spritegroup.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find spritegroup.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("spritegroup").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find spritegroup.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a spritegroup.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("assets/spritegroup.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SpritegroupConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(SpritegroupConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SpritegroupConfig, ConfigError> {
    log::debug!("loading config from {}", path.display());
    let contents = fs::read_to_string(path)?;
    let config: SpritegroupConfig = toml::from_str(&contents)?;
    check(config)
}

fn check(config: SpritegroupConfig) -> Result<SpritegroupConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}
