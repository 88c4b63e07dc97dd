//! Application configuration.
//!
//! Resolution order: built-in defaults, then the optional TOML file at
//! `CONFIG_PATH` (default `config.toml`), then environment variables.

mod env_config;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

pub use crate::auth::config::{AuthConfig, PasswordConfig};
use crate::auth::config::MIN_SECRET_LEN;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,

    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,

    /// `*` for any origin, otherwise a comma separated list.
    #[serde(default = "ServerConfig::default_cors_allow_origin")]
    pub cors_allow_origin: String,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        5000
    }
    fn default_cors_allow_origin() -> String {
        "*".to_string()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            cors_allow_origin: Self::default_cors_allow_origin(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,

    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_url() -> String {
        "sqlite://./aqualux.db".to_string()
    }
    fn default_max_connections() -> u32 {
        5
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
        }
    }
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (if present) and the environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file_if_exists(Path::new(&path))?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. A missing file yields the defaults.
    pub fn from_file_if_exists(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Checks that apply to every command.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("PORT must be non-zero");
        }
        let cost = self.auth.password.bcrypt_cost;
        if !(4..=31).contains(&cost) {
            bail!("BCRYPT_COST must be between 4 and 31, got {cost}");
        }
        if self.auth.token_expiry == 0 {
            bail!("TOKEN_EXPIRY must be positive");
        }
        Ok(())
    }

    /// Extra checks before serving requests: a signing secret is mandatory.
    pub fn validate_for_server(&self) -> Result<()> {
        self.validate()?;
        let len = self.auth.jwt_secret.len();
        if len == 0 {
            bail!("JWT_SECRET is not set");
        }
        if len < MIN_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes, got {len}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.cors_allow_origin, "*");
        assert_eq!(config.database.url, "sqlite://./aqualux.db");
        assert_eq!(config.auth.password.bcrypt_cost, 12);
    }

    #[test]
    fn test_partial_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[auth.password]\nmin_length = 10\n\n[database]\nurl = \"sqlite::memory:\""
        )
        .unwrap();

        let config = AppConfig::from_file_if_exists(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.password.min_length, 10);
        assert!(config.auth.password.require_digit);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_file_if_exists(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        assert!(AppConfig::from_file_if_exists(file.path()).is_err());
    }

    #[test]
    fn test_server_validation_requires_strong_secret() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_for_server().is_err());

        config.auth.jwt_secret = "short".into();
        assert!(config.validate_for_server().is_err());

        config.auth.jwt_secret = "x".repeat(MIN_SECRET_LEN);
        assert!(config.validate_for_server().is_ok());

        config.auth.password.bcrypt_cost = 2;
        assert!(config.validate().is_err());
    }
}
