use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::WrapperConfig;

/// Environment variable naming the wrapped binary.
pub const BINARY_ENV: &str = "CLAUDE_BIN";
/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "ANTON_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl WrapperConfig {
    /// Returns the path to the configuration file.
    ///
    /// `ANTON_CONFIG` wins; otherwise `~/.config/anton/config.toml` on
    /// Unix/macOS or the platform equivalent via `dirs::config_dir()`.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("anton").join("config.toml")
    }

    /// Loads the config file and applies environment overrides.
    ///
    /// Configuration problems are never fatal: a broken file is logged
    /// and replaced by defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut config = match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{}; using defaults", err);
                WrapperConfig::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields `WrapperConfig::default()`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(WrapperConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Applies environment overrides through the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(binary) = lookup(BINARY_ENV).filter(|value| !value.trim().is_empty()) {
            self.agent.binary = binary;
        }
    }
}
