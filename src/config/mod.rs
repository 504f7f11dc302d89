// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Configuration module for the EvoFit server
//!
//! Configuration is read once from environment variables at startup and handed
//! to request handlers through `ServerResources`; there is no global instance.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AppInfo, AuthConfig, CorsConfig, DatabaseConfig, DatabaseUrl, Environment, ServerConfig,
    StorageConfig,
};
