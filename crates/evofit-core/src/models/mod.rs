// ABOUTME: Domain models for users, measurements, goals, workouts, meals, and photos
// ABOUTME: Plain data types shared by the database layer, services, and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

/// User accounts
pub mod user;

/// Body measurement snapshots
pub mod measurement;

/// Goals and derived progress state
pub mod goal;

/// Workout sessions and exercises
pub mod workout;

/// Meal logs
pub mod meal;

/// Progress photo metadata
pub mod photo;

pub use goal::Goal;
pub use meal::{Meal, MealType};
pub use measurement::{BodyMeasurement, Circumferences, Skinfolds};
pub use photo::{PhotoType, ProgressPhoto};
pub use user::{normalize_email, Gender, User};
pub use workout::{Exercise, ExerciseType, Feeling, Intensity, Workout};
