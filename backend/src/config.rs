//! Application configuration file support.
//!
//! Configuration is read from a TOML file and then overridden from the
//! environment:
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8000"
//! token = "..."
//! request_timeout_secs = 30
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_BACKEND_URL: &str = "COURSEGEN_BACKEND_URL";
pub const ENV_TOKEN: &str = "COURSEGEN_TOKEN";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Connection settings for the course backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    /// Bearer token. Also sent as the `token` query parameter on stream URLs.
    #[serde(default)]
    pub token: Option<String>,
    /// Timeout for REST calls. Generation streams are never timed out.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Bind address of the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl BackendSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, without environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `coursegen.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("coursegen.toml"),
            PathBuf::from("backend/coursegen.toml"),
            PathBuf::from("../coursegen.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::Read {
            path: "coursegen.toml".to_string(),
            message: "no coursegen.toml found in standard locations".to_string(),
        })
    }

    /// Build a configuration from the environment alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(ENV_BACKEND_URL).map_err(|_| {
            ConfigError::Invalid(format!("{} must be set when no config file is used", ENV_BACKEND_URL))
        })?;
        let mut config = AppConfig {
            backend: BackendSettings::new(base_url),
            server: ServerSettings::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location when a file exists, else from the environment.
    ///
    /// Environment overrides always apply, and the result is validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::from_default_location() {
            Ok(mut config) => {
                config.apply_env_overrides()?;
                config.validate()?;
                Ok(config)
            }
            Err(ConfigError::Read { message, .. }) => {
                log::info!("{}; falling back to environment", message);
                Self::from_env()
            }
            Err(e) => Err(e),
        }
    }

    /// Override settings from `COURSEGEN_BACKEND_URL`, `COURSEGEN_TOKEN`, `HOST` and `PORT`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            self.backend.base_url = url;
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.backend.token = if token.is_empty() { None } else { Some(token) };
        }
        if let Ok(host) = std::env::var(ENV_HOST) {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", ENV_PORT, port, e)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("backend.base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "backend.base_url must start with http:// or https:// (got '{}')",
                url
            )));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        Ok(())
    }
}
