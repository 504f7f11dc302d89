// ABOUTME: Inclusive bounds for every validated numeric and text field
// ABOUTME: Single source for request validation so routes and tests agree on limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use std::ops::RangeInclusive;

// Body composition
/// Body weight in kilograms
pub const WEIGHT_KG: RangeInclusive<f64> = 20.0..=500.0;
/// Body fat percentage
pub const BODY_FAT_PERCENTAGE: RangeInclusive<f64> = 0.0..=100.0;
/// Muscle mass in kilograms
pub const MUSCLE_MASS_KG: RangeInclusive<f64> = 0.0..=200.0;

// Circumferences (cm)
/// Neck, arms, forearms and calves
pub const LIMB_CIRCUMFERENCE_CM: RangeInclusive<f64> = 0.0..=100.0;
/// Chest, waist, abdomen and hips
pub const TORSO_CIRCUMFERENCE_CM: RangeInclusive<f64> = 0.0..=200.0;
/// Thighs
pub const THIGH_CIRCUMFERENCE_CM: RangeInclusive<f64> = 0.0..=150.0;
/// Skinfold thickness in millimetres
pub const SKINFOLD_MM: RangeInclusive<f64> = 0.0..=100.0;

// Users
/// Height in centimetres
pub const HEIGHT_CM: RangeInclusive<i64> = 50..=300;
/// Profile target weight in kilograms
pub const PROFILE_TARGET_WEIGHT_KG: RangeInclusive<i64> = 20..=500;
/// Full name length
pub const FULL_NAME_LEN: RangeInclusive<usize> = 1..=255;

// Goals
/// Goal type label length
pub const GOAL_TYPE_LEN: RangeInclusive<usize> = 1..=50;
/// Goal title length
pub const GOAL_TITLE_LEN: RangeInclusive<usize> = 1..=200;
/// Goal unit label length
pub const GOAL_UNIT_MAX_LEN: usize = 50;
/// Progress override bounds
pub const PROGRESS_PERCENT: RangeInclusive<f64> = 0.0..=100.0;

// Workouts
/// Workout type label length
pub const WORKOUT_TYPE_LEN: RangeInclusive<usize> = 1..=100;
/// Workout or exercise duration in minutes
pub const DURATION_MINUTES: RangeInclusive<i64> = 0..=600;
/// Calories burned per workout
pub const CALORIES_BURNED: RangeInclusive<i64> = 0..=10_000;
/// Exercise name length
pub const EXERCISE_NAME_LEN: RangeInclusive<usize> = 1..=200;
/// Sets per exercise
pub const SETS: RangeInclusive<i64> = 1..=50;
/// Reps per set
pub const REPS: RangeInclusive<i64> = 1..=500;
/// Load in kilograms
pub const LOAD_KG: RangeInclusive<f64> = 0.0..=1000.0;
/// Rest between sets in seconds
pub const REST_SECONDS: RangeInclusive<i64> = 0..=600;
/// Distance in kilometres
pub const DISTANCE_KM: RangeInclusive<f64> = 0.0..=1000.0;

// Meals
/// Meal name length
pub const MEAL_NAME_MAX_LEN: usize = 200;
/// Calories per meal
pub const MEAL_CALORIES: RangeInclusive<i64> = 0..=10_000;
/// Protein, carbs and fats in grams
pub const MACRO_GRAMS: RangeInclusive<f64> = 0.0..=1000.0;
/// Fiber in grams
pub const FIBER_GRAMS: RangeInclusive<f64> = 0.0..=200.0;
/// Water in millilitres
pub const WATER_ML: RangeInclusive<i64> = 0..=10_000;

// Progress photos
/// Body weight recorded alongside a photo, in whole kilograms
pub const PHOTO_WEIGHT_KG: RangeInclusive<i64> = 20..=500;
