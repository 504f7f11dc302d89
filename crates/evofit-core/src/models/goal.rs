// ABOUTME: Goal model with declared targets and engine-derived progress fields
// ABOUTME: Documents which fields the progress engine owns versus direct edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-declared fitness target
///
/// `current_progress`, `is_completed` and `completed_date` are derived state:
/// the goal progress engine writes them on recompute. Direct updates may also
/// override `current_progress` and `is_completed`; both write paths are
/// legitimate and neither validates the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Free-form label such as `weight_loss`; never branched on
    pub goal_type: String,
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Target body weight in kilograms
    pub target_weight_kg: Option<f64>,
    /// Target body fat percentage
    pub target_body_fat_percentage: Option<f64>,
    /// Target muscle mass in kilograms
    pub target_muscle_mass_kg: Option<f64>,
    /// Free-form numeric target (not used for progress)
    pub target_value: Option<f64>,
    /// Unit for `target_value`
    pub target_unit: Option<String>,
    /// Day progress is measured from
    pub start_date: NaiveDate,
    /// Optional deadline
    pub target_date: Option<NaiveDate>,
    /// Day the goal first reached completion
    pub completed_date: Option<NaiveDate>,
    /// Completion flag
    pub is_completed: bool,
    /// Archival flag, orthogonal to completion
    pub is_active: bool,
    /// Percentage in [0, 100]; `None` until first computed
    pub current_progress: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Create an active, incomplete goal with no computed progress
    #[must_use]
    pub fn new(user_id: Uuid, goal_type: String, title: String, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            goal_type,
            title,
            description: None,
            target_weight_kg: None,
            target_body_fat_percentage: None,
            target_muscle_mass_kg: None,
            target_value: None,
            target_unit: None,
            start_date,
            target_date: None,
            completed_date: None,
            is_completed: false,
            is_active: true,
            current_progress: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether any body-composition target is declared
    #[must_use]
    pub const fn has_metric_target(&self) -> bool {
        self.target_weight_kg.is_some()
            || self.target_body_fat_percentage.is_some()
            || self.target_muscle_mass_kg.is_some()
    }

    /// Mark completed by direct override
    ///
    /// Only the incomplete-to-complete edge stamps `completed_date`, so a reopened
    /// goal gets a fresh date while an already completed goal keeps its own.
    pub fn mark_completed(&mut self, today: NaiveDate) {
        if !self.is_completed {
            self.completed_date = Some(today);
        }
        self.is_completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_goal_lifecycle_defaults() {
        let goal = Goal::new(
            Uuid::new_v4(),
            "weight_loss".to_owned(),
            "Lose 10kg".to_owned(),
            date(2024, 1, 1),
        );
        assert!(goal.is_active);
        assert!(!goal.is_completed);
        assert!(goal.current_progress.is_none());
        assert!(goal.completed_date.is_none());
        assert!(!goal.has_metric_target());
    }

    #[test]
    fn test_mark_completed_restamps_reopened_goal() {
        let mut goal = Goal::new(
            Uuid::new_v4(),
            "strength".to_owned(),
            "Gain muscle".to_owned(),
            date(2024, 1, 1),
        );
        goal.completed_date = Some(date(2024, 2, 1));
        goal.mark_completed(date(2024, 6, 1));
        assert!(goal.is_completed);
        assert_eq!(goal.completed_date, Some(date(2024, 6, 1)));

        goal.mark_completed(date(2024, 7, 1));
        assert_eq!(goal.completed_date, Some(date(2024, 6, 1)));
    }
}
