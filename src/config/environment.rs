// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed server, database, auth, CORS, and storage config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Environment-based configuration management

use crate::auth::generate_jwt_secret;
use crate::constants::{auth, database, ports, service_names, storage};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path of the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the URL names a database engine other than `SQLite`
    pub fn parse_url(s: &str) -> AppResult<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" || path_str.is_empty() {
                return Ok(Self::Memory);
            }
            return Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            });
        }

        if s.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL scheme: {s}"
            )));
        }

        // Bare path: treat as SQLite file
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from(
                database::DEFAULT_DATABASE_URL
                    .strip_prefix("sqlite:")
                    .unwrap_or(database::DEFAULT_DATABASE_URL),
            ),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Create missing tables on startup
    pub auto_migrate: bool,
}

/// Token signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub access_token_expire_minutes: i64,
    /// Refresh token lifetime
    pub refresh_token_expire_days: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("refresh_token_expire_days", &self.refresh_token_expire_days)
            .finish()
    }
}

impl AuthConfig {
    /// Load token configuration from the environment
    ///
    /// A missing `JWT_SECRET_KEY` is fatal in production; elsewhere a random
    /// secret is generated, which invalidates tokens on every restart.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is missing in production or a lifetime is not a number
    pub fn from_env(environment: Environment) -> AppResult<Self> {
        let jwt_secret = match env::var("JWT_SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                return Err(AppError::config(
                    "JWT_SECRET_KEY must be set in production",
                ));
            }
            _ => {
                warn!("JWT_SECRET_KEY not set; generated an ephemeral secret");
                generate_jwt_secret()
            }
        };

        Ok(Self {
            jwt_secret,
            access_token_expire_minutes: parse_env(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                auth::ACCESS_TOKEN_EXPIRE_MINUTES,
            )?,
            refresh_token_expire_days: parse_env(
                "REFRESH_TOKEN_EXPIRE_DAYS",
                auth::REFRESH_TOKEN_EXPIRE_DAYS,
            )?,
        })
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Whether every origin is allowed
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Progress photo storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Public base URL prefixed to stored photo paths
    pub photo_base_url: String,
}

/// Application identity reported by the root and health endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    /// Display name
    pub name: String,
    /// Semantic version
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: service_names::APP_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP API port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Photo storage configuration
    pub storage: StorageConfig,
    /// Application identity
    pub app: AppInfo,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or a production requirement is unmet
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment =
            Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            environment,
            http_port: parse_env("HTTP_PORT", ports::DEFAULT_HTTP_PORT)?,
            host: env_var_or("HOST", "0.0.0.0"),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    "DATABASE_URL",
                    database::DEFAULT_DATABASE_URL,
                ))?,
                auto_migrate: parse_env("AUTO_MIGRATE", true)?,
            },
            auth: AuthConfig::from_env(environment)?,
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or(
                    "CORS_ORIGINS",
                    "http://localhost:3000",
                )),
            },
            storage: StorageConfig {
                photo_base_url: env_var_or("PHOTO_BASE_URL", storage::DEFAULT_PHOTO_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
            },
            app: AppInfo::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for consistency
    ///
    /// # Errors
    ///
    /// Returns an error if the JWT secret is unusable or a token lifetime is not positive
    pub fn validate(&self) -> AppResult<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::config("JWT secret cannot be empty"));
        }

        if self.environment.is_production()
            && self.auth.jwt_secret.len() < auth::MIN_JWT_SECRET_LENGTH
        {
            return Err(AppError::config(format!(
                "JWT_SECRET_KEY must be at least {} characters in production",
                auth::MIN_JWT_SECRET_LENGTH
            )));
        }

        if self.auth.access_token_expire_minutes <= 0 || self.auth.refresh_token_expire_days <= 0
        {
            return Err(AppError::config("Token lifetimes must be positive"));
        }

        if self.environment.is_production() && self.cors.allows_any_origin() {
            warn!("CORS allows any origin in production");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} Configuration:\n\
             - Environment: {}\n\
             - Bind: {}:{}\n\
             - Database: {}\n\
             - Access token: {} min\n\
             - Refresh token: {} days\n\
             - CORS origins: {}\n\
             - Photo storage: {}",
            self.app.name,
            self.environment,
            self.host,
            self.http_port,
            self.database.url,
            self.auth.access_token_expire_minutes,
            self.auth.refresh_token_expire_days,
            self.cors.allowed_origins.join(", "),
            self.storage.photo_base_url,
        )
    }

    /// Configuration for tests: in-memory database and a fixed secret
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            environment: Environment::Testing,
            http_port: 0,
            host: "127.0.0.1".to_owned(),
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
                auto_migrate: true,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-key-for-evofit-integration-tests".to_owned(),
                access_token_expire_minutes: auth::ACCESS_TOKEN_EXPIRE_MINUTES,
                refresh_token_expire_days: auth::REFRESH_TOKEN_EXPIRE_DAYS,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_owned()],
            },
            storage: StorageConfig {
                photo_base_url: storage::DEFAULT_PHOTO_BASE_URL.to_owned(),
            },
            app: AppInfo::default(),
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        return vec!["*".to_owned()];
    }
    origins_str
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("invalid"),
            Environment::Development
        );
    }

    #[test]
    fn test_database_url_parsing() {
        let file = DatabaseUrl::parse_url("sqlite:./data/evofit.db").unwrap();
        assert_eq!(file.to_connection_string(), "sqlite:./data/evofit.db");
        assert!(!file.is_memory());

        assert!(DatabaseUrl::parse_url("sqlite::memory:").unwrap().is_memory());
        assert!(DatabaseUrl::parse_url("postgresql://localhost/db").is_err());
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let config = ServerConfig::for_testing();
        let rendered = format!("{:?}", config.auth);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(&config.auth.jwt_secret));
    }

    #[test]
    fn test_validate_rejects_short_production_secret() {
        let mut config = ServerConfig::for_testing();
        config.environment = Environment::Production;
        config.auth.jwt_secret = "short".to_owned();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = "x".repeat(auth::MIN_JWT_SECRET_LENGTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_expiry() {
        let mut config = ServerConfig::for_testing();
        config.auth.access_token_expire_minutes = 0;
        assert!(config.validate().is_err());
    }
}
