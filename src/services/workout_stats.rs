// ABOUTME: Workout volume statistics over an optional date window
// ABOUTME: Counts sessions, sums duration and calories, and tallies workout types

use crate::constants::limits::AGGREGATION_ROW_LIMIT;
use crate::database::{Database, ListWorkoutsFilter};
use crate::errors::{AppError, AppResult};
use crate::intelligence::round_to;
use crate::models::Workout;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Aggregate training volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutStats {
    /// Sessions logged
    pub total_workouts: usize,
    /// Minutes trained
    pub total_duration_minutes: i64,
    /// Calories burned
    pub total_calories_burned: i64,
    /// Sessions per workout type
    pub workout_types: BTreeMap<String, usize>,
    /// Mean session length, two decimals
    pub average_duration: f64,
}

/// Aggregate a set of workouts
#[must_use]
pub fn summarize_workouts(workouts: &[Workout]) -> WorkoutStats {
    let mut workout_types = BTreeMap::new();
    let mut total_duration_minutes = 0_i64;
    let mut total_calories_burned = 0_i64;

    for workout in workouts {
        total_duration_minutes += i64::from(workout.duration_minutes.unwrap_or(0));
        total_calories_burned += i64::from(workout.calories_burned.unwrap_or(0));
        *workout_types
            .entry(workout.workout_type.clone())
            .or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let average_duration = if workouts.is_empty() {
        0.0
    } else {
        round_to(total_duration_minutes as f64 / workouts.len() as f64, 2)
    };

    WorkoutStats {
        total_workouts: workouts.len(),
        total_duration_minutes,
        total_calories_burned,
        workout_types,
        average_duration,
    }
}

/// Workout statistics for a user
///
/// # Errors
///
/// Returns an invalid-input error for an inverted range, or an error if database operation fails
pub async fn workout_stats(
    database: &Database,
    user_id: Uuid,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> AppResult<WorkoutStats> {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(AppError::invalid_input(
                "end_date must be on or after start_date",
            ));
        }
    }

    let workouts = database
        .workouts()
        .list(
            user_id,
            &ListWorkoutsFilter {
                start_date,
                end_date,
                workout_type: None,
                limit: AGGREGATION_ROW_LIMIT,
            },
        )
        .await?;

    Ok(summarize_workouts(&workouts))
}
