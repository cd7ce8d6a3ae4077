//! Configuration loading and representation.
//!
//! The service reads one YAML file:
//!
//! ```yaml
//! env: "local"
//! storage_path: "storage/students.db"
//! http_server:
//!   address: "127.0.0.1:8082"
//!   shutdown_grace_secs: 5   # optional
//! ```
//!
//! The file path comes from the `CONFIG_PATH` environment variable, falling
//! back to the `--config` command-line flag.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CONFIG_PATH environment variable or --config flag must be set")]
    MissingPath,

    #[error("configuration file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("configuration field `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// Fully resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Deployment environment label (`local`, `dev`, `prod`, ...).
    pub env: String,
    pub storage_path: PathBuf,
    pub http_server: HttpServer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpServer {
    pub address: String,
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_shutdown_grace_secs() -> u64 {
    DEFAULT_SHUTDOWN_GRACE_SECS
}

impl HttpServer {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Config {
    /// Pick the config file path: the environment variable wins over the flag.
    pub fn resolve_path(
        env_value: Option<PathBuf>,
        flag: Option<PathBuf>,
    ) -> Result<PathBuf, ConfigError> {
        env_value
            .filter(|p| !p.as_os_str().is_empty())
            .or(flag.filter(|p| !p.as_os_str().is_empty()))
            .ok_or(ConfigError::MissingPath)
    }

    /// Read and validate the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.env.trim().is_empty() {
            return Err(ConfigError::EmptyField("env"));
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyField("storage_path"));
        }
        if self.http_server.address.trim().is_empty() {
            return Err(ConfigError::EmptyField("http_server.address"));
        }
        Ok(())
    }
}
