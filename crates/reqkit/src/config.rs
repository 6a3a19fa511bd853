//! Loading [`HttpConfig`] from YAML files and the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::client::HttpConfig;

/// Environment variable names.
pub mod vars {
    pub const REQKIT_TIMEOUT_SECS: &str = "REQKIT_TIMEOUT_SECS";
    pub const REQKIT_USER_AGENT: &str = "REQKIT_USER_AGENT";
    pub const REQKIT_RETRIES: &str = "REQKIT_RETRIES";
    pub const REQKIT_GZIP: &str = "REQKIT_GZIP";
}

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", .line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },
}

/// On-disk form of [`HttpConfig`]. Missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub gzip: Option<bool>,
    pub retries: Option<u32>,
}

impl ConfigFile {
    /// Apply the keys that are set on top of `config`.
    pub fn apply(self, mut config: HttpConfig) -> HttpConfig {
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(gzip) = self.gzip {
            config.gzip = gzip;
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        config
    }
}

impl HttpConfig {
    /// Parse a YAML document over the defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;
        let config = file.apply(HttpConfig::default());
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults overridden by `REQKIT_*` variables, after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::default().with_env_overrides()
    }

    /// Override fields from `REQKIT_*` variables that are set.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(secs) = env_parse::<u64>(vars::REQKIT_TIMEOUT_SECS)? {
            self.timeout = Duration::from_secs(secs);
        }
        if let Ok(user_agent) = std::env::var(vars::REQKIT_USER_AGENT) {
            self.user_agent = user_agent;
        }
        if let Some(retries) = env_parse::<u32>(vars::REQKIT_RETRIES)? {
            self.retries = retries;
        }
        if let Ok(gzip) = std::env::var(vars::REQKIT_GZIP) {
            self.gzip = matches!(gzip.to_lowercase().as_str(), "true" | "1" | "yes");
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError {
                message: "timeout must be greater than 0".to_string(),
            });
        }
        if self.retries == 0 {
            return Err(ConfigError::ValidationError {
                message: "retries must be at least 1".to_string(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "user_agent must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("cannot parse {:?}", v),
        }),
        Err(_) => Ok(None),
    }
}
