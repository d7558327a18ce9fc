//! Application configuration
//!
//! Settings come from three layers, later ones winning:
//! built-in defaults, `~/.config/costday/config.toml`, then `COSTDAY_*`
//! environment variables.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::Backend;

const CONFIG_ENV: &str = "COSTDAY_CONFIG";
const DATA_DIR_ENV: &str = "COSTDAY_DATA_DIR";
const BACKEND_ENV: &str = "COSTDAY_BACKEND";
const CURRENCY_ENV: &str = "COSTDAY_CURRENCY";
const LOG_ENV: &str = "COSTDAY_LOG";

/// Where assets are kept and how amounts are shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the saved asset collection
    pub data_dir: PathBuf,

    /// Blob backend holding the asset collection
    pub backend: Backend,

    /// Symbol printed in front of amounts
    pub currency_symbol: String,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("costday"),
            backend: Backend::default(),
            currency_symbol: "¥".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from the default config file, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Like [`Config::load`], but `path` (from `--config`) replaces the default file
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::load_from_path_with(path, process_env)
    }

    /// Like [`Config::load_from_path`], reading overrides through `lookup`
    ///
    /// Pass `|_| None` to get exactly what the file says.
    pub fn load_from_path_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?
        } else {
            String::new()
        };

        Self::load_from_str_with(&content, lookup)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from TOML text, then apply environment overrides
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        Self::load_from_str_with(toml_content, process_env)
    }

    /// Load from TOML text, reading overrides through `lookup`
    pub fn load_from_str_with<F>(toml_content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::parse(toml_content)?;
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn parse(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse config TOML")
    }

    /// Apply `COSTDAY_*` overrides read through `lookup`
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(dir) = var(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = var(BACKEND_ENV) {
            self.backend = backend
                .parse()
                .map_err(|e: String| anyhow!(e))
                .with_context(|| format!("Invalid {}", BACKEND_ENV))?;
        }
        if let Some(symbol) = var(CURRENCY_ENV) {
            self.currency_symbol = symbol;
        }
        if let Some(level) = var(LOG_ENV) {
            self.log_level = level;
        }
        Ok(())
    }

    /// Write to `path` as TOML, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Default config file location, or `COSTDAY_CONFIG` when set
    pub fn config_file_path() -> PathBuf {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("costday")
                .join("config.toml"),
        }
    }

    /// Directory the file backend writes blobs into
    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Database used by the sqlite backend
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("costday.db")
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
