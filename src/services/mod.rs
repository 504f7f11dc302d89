// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Route handlers stay thin and delegate validation, aggregation, and state changes here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Domain service layer
//!
//! Services hold the business rules that would otherwise sit inside route
//! handlers, so the same rules apply to every caller and can be tested
//! without an HTTP stack.

/// Registration, login, and token refresh
pub mod auth;

/// Goal progress engine driven by the measurement history
pub mod goal_progress;

/// Daily and period nutrition summaries
pub mod nutrition;

/// Progress photo upload storage
pub mod photo_storage;

/// Workout volume statistics
pub mod workout_stats;
