//! Configuration file handling for console-cli

use anyhow::{Context, Result};
use console_client::{DEFAULT_API_PREFIX, DEFAULT_LEGACY_REDIRECT_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default server URL
    pub server: Option<String>,
    /// Path prefix of the console API
    pub api_prefix: Option<String>,
    /// Path whose failures point the user at the legacy console
    pub legacy_redirect_path: Option<String>,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("console-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        server: Option<&str>,
        token: Option<&str>,
        output: Option<&str>,
        no_color: bool,
    ) -> MergedConfig {
        MergedConfig {
            server: server
                .map(String::from)
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            api_prefix: self
                .api_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            legacy_redirect_path: self
                .legacy_redirect_path
                .clone()
                .unwrap_or_else(|| DEFAULT_LEGACY_REDIRECT_PATH.to_string()),
            token: token.map(String::from).or_else(|| self.token.clone()),
            output: output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "table".to_string()),
            no_color: no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    pub server: String,
    pub api_prefix: String,
    pub legacy_redirect_path: String,
    pub token: Option<String>,
    pub output: String,
    pub no_color: bool,
}
