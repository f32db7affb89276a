//! Configuration loading and management
//!
//! Handles parsing of `.taskboard.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::lock;
use crate::storage::CONFIG_FILE;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// REST backend settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Board behaviour
    #[serde(default)]
    pub board: BoardConfig,

    /// Local storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// REST backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoints are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where tasks are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(Error::InvalidArgument(format!(
                "invalid backend '{other}': must be local or remote"
            ))),
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub backend: BackendKind,
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Namespace key for persisted UI state
    #[serde(default = "default_state_key")]
    pub state_key: String,
}

fn default_state_key() -> String {
    "taskboard-ui".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_key: default_state_key(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskboard.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a data directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        Self::load_from_dir_checked(dir).0
    }

    /// Like [`Config::load_from_dir`], also describing an ignored invalid file.
    pub fn load_from_dir_checked(dir: &Path) -> (Self, Option<String>) {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return (Self::default(), None);
        }
        match Self::load(&config_path) {
            Ok(config) => (config, None),
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                let warning = format!("ignoring invalid {}: {err}", config_path.display());
                (Self::default(), Some(warning))
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        lock::write_atomic_locked(path, content.as_bytes(), lock::DEFAULT_LOCK_TIMEOUT_MS)
    }

    fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::InvalidConfig("api.base_url cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "api.base_url must start with http:// or https:// (got '{url}')"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "api.timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.state_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.state_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
