//! Service configuration.
//!
//! Settings come from environment variables. Credentials have no default;
//! everything else does.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_VERSION: &str = "v1";
const DEFAULT_DATABASE_FILE: &str = "database_files/database.sqlite3";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is set to something unusable
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Configuration for the alias service.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Path segment every alias route is nested under (e.g. `v1`)
    pub api_version: String,
    /// Basic-auth username
    pub username: String,
    /// Basic-auth secret
    pub token: String,
    /// SQLite database file
    pub database_file: PathBuf,
}

impl ServiceConfig {
    /// Create a config with the given credentials and defaults for the rest.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            api_version: DEFAULT_VERSION.to_string(),
            username: username.into(),
            token: token.into(),
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a variable lookup function.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `API_HOST` | `0.0.0.0` |
    /// | `API_PORT` | `8000` |
    /// | `API_VERSION` | `v1` |
    /// | `APP_DEFAULT_USER` | required |
    /// | `APP_DEFAULT_TOKEN` | required |
    /// | `DATABASE_FILE` | `database_files/database.sqlite3` |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup("APP_DEFAULT_USER")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("APP_DEFAULT_USER"))?;
        let token = lookup("APP_DEFAULT_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("APP_DEFAULT_TOKEN"))?;

        let mut config = Self::new(username, token);

        if let Some(host) = lookup("API_HOST") {
            let ip: IpAddr = host.parse().map_err(|e| ConfigError::Invalid {
                name: "API_HOST",
                message: format!("{host:?}: {e}"),
            })?;
            config.bind_addr.set_ip(ip);
        }

        if let Some(port) = lookup("API_PORT") {
            let port: u16 = port.parse().map_err(|e| ConfigError::Invalid {
                name: "API_PORT",
                message: format!("{port:?}: {e}"),
            })?;
            config.bind_addr.set_port(port);
        }

        if let Some(version) = lookup("API_VERSION") {
            validate_version(&version)?;
            config.api_version = version;
        }

        if let Some(path) = lookup("DATABASE_FILE").filter(|v| !v.is_empty()) {
            config.database_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("bind_addr", &self.bind_addr)
            .field("api_version", &self.api_version)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("database_file", &self.database_file)
            .finish()
    }
}

/// The version must be a single non-empty path segment.
fn validate_version(version: &str) -> Result<(), ConfigError> {
    if version.is_empty() || version.contains('/') || version.starts_with(':') {
        return Err(ConfigError::Invalid {
            name: "API_VERSION",
            message: format!("{version:?} is not a single path segment"),
        });
    }
    Ok(())
}
