// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, resource, user, and token helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `evofit_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use axum::Router;
use chrono::NaiveDate;
use evofit_server::config::ServerConfig;
use evofit_server::database::Database;
use evofit_server::models::User;
use evofit_server::resources::ServerResources;
use evofit_server::server::build_router;
use evofit_server::services::goal_progress::FixedClock;
use std::env;
use std::sync::{Arc, Once};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Password given to every user created by these helpers
pub const TEST_PASSWORD: &str = "test-password-123";

/// Date the test clock reports as "today"
pub const TODAY: (i32, u32, u32) = (2024, 6, 30);

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Calendar date shorthand
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// The date the test clock is pinned to
pub fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Server resources over a fresh in-memory database with the clock pinned to [`today`]
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let resources = ServerResources::new(database, Arc::new(ServerConfig::for_testing()))
        .with_clock(Arc::new(FixedClock(today())));
    Ok(Arc::new(resources))
}

/// Full application router over the given resources
pub fn test_router(resources: &Arc<ServerResources>) -> Router {
    build_router(resources)
}

/// Insert an active user whose password is [`TEST_PASSWORD`]
///
/// Uses the minimum bcrypt cost so tests stay fast.
pub async fn create_test_user(database: &Database, email: &str) -> Result<User> {
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4)?;
    let mut user = User::new(email, "Test User".to_owned(), password_hash);
    user.height_cm = Some(180);
    Ok(database.users().create(&user).await?)
}

/// Insert a user and grant administrator rights
pub async fn create_admin_user(database: &Database, email: &str) -> Result<User> {
    let mut user = create_test_user(database, email).await?;
    database.users().set_admin(user.id, true).await?;
    user.is_admin = true;
    Ok(user)
}

/// Issue an access token for a user
pub fn access_token(resources: &ServerResources, user: &User) -> String {
    resources
        .auth_manager
        .generate_token_pair(user)
        .expect("token generation")
        .access_token
}
