// ABOUTME: Body measurement snapshot model with composition, circumferences, and skinfolds
// ABOUTME: Snapshots are the time series the goal progress engine reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use crate::intelligence::round_to;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Circumference measurements in centimetres
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circumferences {
    /// Neck
    pub neck_cm: Option<f64>,
    /// Chest
    pub chest_cm: Option<f64>,
    /// Waist
    pub waist_cm: Option<f64>,
    /// Abdomen
    pub abdomen_cm: Option<f64>,
    /// Hips
    pub hips_cm: Option<f64>,
    /// Right bicep
    pub right_bicep_cm: Option<f64>,
    /// Left bicep
    pub left_bicep_cm: Option<f64>,
    /// Right forearm
    pub right_forearm_cm: Option<f64>,
    /// Left forearm
    pub left_forearm_cm: Option<f64>,
    /// Right thigh
    pub right_thigh_cm: Option<f64>,
    /// Left thigh
    pub left_thigh_cm: Option<f64>,
    /// Right calf
    pub right_calf_cm: Option<f64>,
    /// Left calf
    pub left_calf_cm: Option<f64>,
}

/// Skinfold thickness in millimetres
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skinfolds {
    /// Bicep fold
    pub bicep_skinfold_mm: Option<f64>,
    /// Tricep fold
    pub tricep_skinfold_mm: Option<f64>,
    /// Subscapular fold
    pub subscapular_skinfold_mm: Option<f64>,
    /// Suprailiac fold
    pub suprailiac_skinfold_mm: Option<f64>,
    /// Abdominal fold
    pub abdominal_skinfold_mm: Option<f64>,
    /// Thigh fold
    pub thigh_skinfold_mm: Option<f64>,
}

/// One dated body-measurement record (a snapshot)
///
/// Snapshots are immutable points in a user's time series. When two share the
/// same `measurement_date`, the one created later is considered the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Day the measurement was taken
    pub measurement_date: NaiveDate,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass_kg: Option<f64>,
    /// Body mass index, derived from weight and the user's height
    pub bmi: Option<f64>,
    /// Circumferences
    #[serde(flatten)]
    pub circumferences: Circumferences,
    /// Skinfolds
    #[serde(flatten)]
    pub skinfolds: Skinfolds,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl BodyMeasurement {
    /// Body mass index rounded to two decimals
    ///
    /// Returns `None` when the height is not positive.
    #[must_use]
    pub fn calculate_bmi(weight_kg: f64, height_cm: i32) -> Option<f64> {
        if height_cm <= 0 {
            return None;
        }
        let height_m = f64::from(height_cm) / 100.0;
        Some(round_to(weight_kg / (height_m * height_m), 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_rounding() {
        // 80 / 1.8^2 = 24.691...
        assert_eq!(BodyMeasurement::calculate_bmi(80.0, 180), Some(24.69));
        assert_eq!(BodyMeasurement::calculate_bmi(70.0, 175), Some(22.86));
    }

    #[test]
    fn test_bmi_requires_height() {
        assert_eq!(BodyMeasurement::calculate_bmi(80.0, 0), None);
    }

    #[test]
    fn test_flattened_serialization() {
        let now = Utc::now();
        let measurement = BodyMeasurement {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            measurement_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            weight_kg: 82.5,
            body_fat_percentage: Some(18.0),
            muscle_mass_kg: None,
            bmi: None,
            circumferences: Circumferences {
                waist_cm: Some(84.0),
                ..Circumferences::default()
            },
            skinfolds: Skinfolds::default(),
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&measurement).unwrap();
        assert_eq!(value["waist_cm"], 84.0);
        assert_eq!(value["measurement_date"], "2024-03-01");
        assert!(value.get("circumferences").is_none());
    }
}
