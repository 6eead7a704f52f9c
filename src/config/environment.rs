//! Environment configuration
//!
//! This module reads the server configuration from environment variables.
//! The resulting value is built once at startup and handed to the app state.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::config::database::DatabaseConfig;

const DEVELOPMENT_JWT_SECRET: &str = "development-only-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Credentials of the staff account created at startup
#[derive(Debug, Clone)]
pub struct StaffBootstrap {
    pub username: String,
    pub password: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub storage: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub staff_bootstrap: Option<StaffBootstrap>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            access_token_ttl_secs: 300,
            refresh_token_ttl_secs: 86_400,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origins: Vec::new(),
            storage: StorageBackend::Memory,
            database: None,
            staff_bootstrap: None,
        }
    }
}

impl EnvironmentConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => {
                log::warn!("⚠️ JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let storage = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        let database = match storage {
            StorageBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        let staff_bootstrap = match (env::var("STAFF_USERNAME"), env::var("STAFF_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(StaffBootstrap { username, password }),
            _ => None,
        };

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            jwt_secret,
            access_token_ttl_secs: parse_var("ACCESS_TOKEN_TTL_SECS", defaults.access_token_ttl_secs)?,
            refresh_token_ttl_secs: parse_var("REFRESH_TOKEN_TTL_SECS", defaults.refresh_token_ttl_secs)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            storage,
            database,
            staff_bootstrap,
        })
    }

    /// Check whether we are running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check whether we are running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Address the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses an optional variable, falling back to a default when unset
pub(crate) fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("Postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_is_development() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:8000");
        assert!(config.access_token_ttl_secs < config.refresh_token_ttl_secs);
    }
}
