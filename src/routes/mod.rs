// ABOUTME: Route module organization for EvoFit HTTP endpoints
// ABOUTME: Provides route definitions organized by domain with thin handlers over services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Route module for the EvoFit API
//!
//! Each domain module contains only route definitions and thin handler
//! functions that authenticate, validate, and delegate to the database
//! managers or service layer. Everything except the health endpoints lives
//! under `/v1`.

/// Admin-only user oversight routes
pub mod admin;
/// Registration, login, refresh, and logout
pub mod auth;
/// Fitness goal routes
pub mod goals;
/// Health check and system status routes
pub mod health;
/// Meal logging and nutrition summary routes
pub mod meals;
/// Body measurement routes
pub mod measurements;
/// Progress photo routes
pub mod progress_photos;
/// Current user profile routes
pub mod users;
/// Workout routes
pub mod workouts;

pub use admin::AdminRoutes;
pub use auth::AuthRoutes;
pub use goals::GoalRoutes;
pub use health::HealthRoutes;
pub use meals::MealRoutes;
pub use measurements::MeasurementRoutes;
pub use progress_photos::ProgressPhotoRoutes;
pub use users::UserRoutes;
pub use workouts::WorkoutRoutes;

use crate::errors::{AppError, AppResult};
use uuid::Uuid;

/// Not-found error naming a resource, e.g. "Goal not found"
fn not_found(resource: &str) -> AppError {
    AppError::not_found(resource)
}

/// Parse a path id; ids that are not UUIDs cannot name a stored row
fn parse_id(id: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| not_found(resource))
}
