// ABOUTME: Workout session and exercise models with their categorical attributes
// ABOUTME: Exercises belong to a workout and are ordered by order_index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Perceived session intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Easy session
    Low,
    /// Moderate session
    Medium,
    /// Hard session
    High,
}

impl Intensity {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// How the user felt after the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feeling {
    /// Great
    Great,
    /// Good
    Good,
    /// Ok
    Ok,
    /// Tired
    Tired,
    /// Exhausted
    Exhausted,
}

impl Feeling {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Ok => "ok",
            Self::Tired => "tired",
            Self::Exhausted => "exhausted",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "great" => Some(Self::Great),
            "good" => Some(Self::Good),
            "ok" => Some(Self::Ok),
            "tired" => Some(Self::Tired),
            "exhausted" => Some(Self::Exhausted),
            _ => None,
        }
    }
}

/// Movement category of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    /// Multi-joint lift
    Compound,
    /// Single-joint lift
    Isolation,
    /// Conditioning work
    Cardio,
}

impl ExerciseType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::Isolation => "isolation",
            Self::Cardio => "cardio",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compound" => Some(Self::Compound),
            "isolation" => Some(Self::Isolation),
            "cardio" => Some(Self::Cardio),
            _ => None,
        }
    }
}

/// A single exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: Uuid,
    /// Parent workout
    pub workout_id: Uuid,
    /// Exercise name
    pub exercise_name: String,
    /// Movement category
    pub exercise_type: Option<ExerciseType>,
    /// Number of sets
    pub sets: Option<i32>,
    /// Reps per set
    pub reps: Option<i32>,
    /// Load in kilograms
    pub weight_kg: Option<f64>,
    /// Rest between sets
    pub rest_seconds: Option<i32>,
    /// Distance covered
    pub distance_km: Option<f64>,
    /// Duration in minutes
    pub duration_minutes: Option<i32>,
    /// Position within the workout
    pub order_index: i32,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A logged training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Session date
    pub workout_date: NaiveDate,
    /// Free-form session label, e.g. `strength`
    pub workout_type: String,
    /// Session length
    pub duration_minutes: Option<i32>,
    /// Estimated energy expenditure
    pub calories_burned: Option<i32>,
    /// Perceived intensity
    pub intensity: Option<Intensity>,
    /// Post-session feeling
    pub feeling: Option<Feeling>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Exercises ordered by `order_index`
    pub exercises: Vec<Exercise>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_round_trip_through_db_strings() {
        for intensity in [Intensity::Low, Intensity::Medium, Intensity::High] {
            assert_eq!(Intensity::parse(intensity.as_str()), Some(intensity));
        }
        assert_eq!(Feeling::parse("exhausted"), Some(Feeling::Exhausted));
        assert_eq!(ExerciseType::parse("cardio"), Some(ExerciseType::Cardio));
        assert_eq!(ExerciseType::parse("plyometric"), None);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&Feeling::Ok).unwrap();
        assert_eq!(json, "\"ok\"");
        let parsed: Intensity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Intensity::High);
    }
}
