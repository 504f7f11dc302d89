// ABOUTME: Core types and constants for the EvoFit fitness tracking backend
// ABOUTME: Foundation crate with error handling, domain models, constants, and progress math
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

#![deny(unsafe_code)]

//! # EvoFit Core
//!
//! Foundation crate providing shared types for the EvoFit backend. It has no
//! runtime, database, or HTTP dependencies by default, so it changes rarely
//! and compiles fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: Validation bounds, token lifetimes, list limits
//! - **models**: Users, body measurements, goals, workouts, meals, progress photos
//! - **intelligence**: Goal progress computation and completion state transition

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;

/// Pure domain computations
pub mod intelligence;
