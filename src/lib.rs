// ABOUTME: Main library entry point for the EvoFit fitness tracking API
// ABOUTME: Wires configuration, persistence, services, and REST routes into one server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

#![deny(unsafe_code)]

//! # EvoFit Server
//!
//! REST backend for personal fitness tracking: body measurements, goals,
//! workouts, meals, and progress photos. The central piece is the goal
//! progress engine, which derives each goal's completion percentage from the
//! user's measurement history.
//!
//! ## Architecture
//!
//! - **config**: Environment-driven server configuration
//! - **database**: `SQLite` persistence, one manager per table
//! - **services**: Business logic (authentication, goal progress, nutrition and workout summaries)
//! - **routes**: Axum handlers under `/v1`
//! - **server**: Router assembly, middleware, and graceful shutdown
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use evofit_server::config::ServerConfig;
//! use evofit_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("EvoFit configured with HTTP port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT token issuance and validation
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` persistence layer
pub mod database;

/// Structured logging setup
pub mod logging;

/// Request authentication and CORS middleware
pub mod middleware;

/// Shared server state handed to every route
pub mod resources;

/// REST API routes
pub mod routes;

/// HTTP server assembly
pub mod server;

/// Business logic services
pub mod services;

/// Request field validation helpers
pub mod validation;

// Re-export foundation crate modules so callers use one path
pub use evofit_core::constants;
pub use evofit_core::errors;
pub use evofit_core::intelligence;
pub use evofit_core::models;
