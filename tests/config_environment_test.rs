// ABOUTME: Tests for loading server configuration from environment variables
// ABOUTME: Serialized because they mutate process-wide environment state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use evofit_server::config::{DatabaseUrl, Environment, ServerConfig};
use evofit_server::errors::ErrorCode;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const CONFIG_VARS: &[&str] = &[
    "ENVIRONMENT",
    "HTTP_PORT",
    "HOST",
    "DATABASE_URL",
    "AUTO_MIGRATE",
    "JWT_SECRET_KEY",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
    "REFRESH_TOKEN_EXPIRE_DAYS",
    "CORS_ORIGINS",
    "PHOTO_BASE_URL",
];

fn clear_config_env() {
    for var in CONFIG_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.http_port, 8000);
    assert_eq!(config.host, "0.0.0.0");
    assert!(config.database.auto_migrate);
    assert_eq!(
        config.database.url,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/evofit.db")
        }
    );
    assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
    assert_eq!(config.auth.access_token_expire_minutes, 30);
    // An ephemeral secret is generated outside production
    assert!(!config.auth.jwt_secret.is_empty());
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_config_env();
    env::set_var("HTTP_PORT", "9100");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("JWT_SECRET_KEY", "configured-secret");
    env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "15");
    env::set_var("CORS_ORIGINS", "https://app.example.com, https://admin.example.com");
    env::set_var("PHOTO_BASE_URL", "https://cdn.example.com/photos/");
    env::set_var("AUTO_MIGRATE", "false");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    assert_eq!(config.http_port, 9100);
    assert!(config.database.url.is_memory());
    assert!(!config.database.auto_migrate);
    assert_eq!(config.auth.jwt_secret, "configured-secret");
    assert_eq!(config.auth.access_token_expire_minutes, 15);
    assert_eq!(
        config.cors.allowed_origins,
        vec!["https://app.example.com", "https://admin.example.com"]
    );
    assert_eq!(config.storage.photo_base_url, "https://cdn.example.com/photos");
    assert!(!format!("{:?}", config.auth).contains("configured-secret"));
}

#[test]
#[serial]
fn test_malformed_values_rejected() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");
    let error = ServerConfig::from_env().unwrap_err();
    clear_config_env();
    assert_eq!(error.code, ErrorCode::ConfigError);

    env::set_var("DATABASE_URL", "postgres://localhost/evofit");
    let error = ServerConfig::from_env().unwrap_err();
    clear_config_env();
    assert!(error.message.contains("Unsupported database URL scheme"));
}

#[test]
#[serial]
fn test_production_requires_strong_secret() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");
    assert!(ServerConfig::from_env().is_err());

    env::set_var("JWT_SECRET_KEY", "too-short");
    assert!(ServerConfig::from_env().is_err());

    env::set_var("JWT_SECRET_KEY", "a-production-secret-that-is-long-enough");
    let config = ServerConfig::from_env().unwrap();
    clear_config_env();
    assert!(config.environment.is_production());
}
