//! Configuration management for the RAX credential verification service
//!
//! Values come from built-in defaults, then a TOML file, then `RAX_AUTH_*`
//! environment variables. The credential file path has no default and must be
//! supplied by one of the sources.

use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the working directory when no path is given.
const DEFAULT_CONFIG_NAME: &str = "config";

/// Prefix of environment overrides, e.g. `RAX_AUTH_CREDENTIALS_FILE`.
const ENV_PREFIX: &str = "RAX_AUTH";

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the request listener
    pub bind_address: String,

    /// Listener port. `0` asks the OS for a free port.
    pub port: u16,

    /// Path of the credential store
    /// Environment: RAX_AUTH_CREDENTIALS_FILE
    #[serde(default)]
    pub credentials_file: String,

    /// Maximum concurrent connections
    pub max_clients: usize,

    /// Maximum request line length in bytes, line terminator included
    pub max_request_length: usize,

    /// Maximum accepted user name length in bytes
    pub max_username_length: usize,
}

impl ServerConfig {
    /// Configuration with default limits for the given credential store.
    pub fn new(credentials_file: impl Into<String>) -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2323,
            credentials_file: credentials_file.into(),
            max_clients: 16,
            max_request_length: 512,
            max_username_length: 64,
        }
    }

    /// Load `config.toml` from the working directory (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(File::with_name(DEFAULT_CONFIG_NAME).required(false))
    }

    /// Load the given configuration file, which must exist, with environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(File::from(path).required(true))
    }

    fn load_with<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let defaults = Self::new(String::new());

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("max_request_length", defaults.max_request_length as i64)?
            .set_default("max_username_length", defaults.max_username_length as i64)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials_file.trim().is_empty() {
            return Err(ConfigError::NotFound("credentials_file".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_request_length == 0 {
            return Err(ConfigError::Message(
                "max_request_length must be greater than 0".into(),
            ));
        }

        if self.max_username_length == 0 {
            return Err(ConfigError::Message(
                "max_username_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Credential store path
    pub fn credentials_path(&self) -> PathBuf {
        PathBuf::from(&self.credentials_file)
    }
}
