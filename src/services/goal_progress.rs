// ABOUTME: Goal progress engine service wiring the pure computation to goal and measurement stores
// ABOUTME: Loads snapshots, computes and rounds progress, applies sticky completion, and persists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! # Goal Progress Engine
//!
//! One recompute is two reads (latest snapshot, baseline snapshot) and one
//! write (the goal's progress fields). Re-running with an unchanged snapshot
//! set writes identical values, so concurrent recomputes of the same goal are
//! safe under last-writer-wins.

use crate::database::stores::{GoalStore, MeasurementStore};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{apply_progress, compute_progress, round_progress, CompletionTransition};
use crate::logging::AppLogger;
use crate::models::Goal;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Source of "today" for completion dates
pub trait Clock: Send + Sync {
    /// Current calendar date
    fn today(&self) -> NaiveDate;
}

/// Wall-clock UTC date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Computes and persists goal progress from a user's measurement history
pub struct GoalProgressEngine<M, G> {
    measurements: M,
    goals: G,
    clock: Arc<dyn Clock>,
}

impl<M, G> GoalProgressEngine<M, G>
where
    M: MeasurementStore,
    G: GoalStore,
{
    /// Create an engine that dates completions with the system clock
    pub fn new(measurements: M, goals: G) -> Self {
        Self::with_clock(measurements, goals, Arc::new(SystemClock))
    }

    /// Create an engine with an explicit clock
    pub fn with_clock(measurements: M, goals: G, clock: Arc<dyn Clock>) -> Self {
        Self {
            measurements,
            goals,
            clock,
        }
    }

    /// Unrounded progress for a goal against the owner's current snapshots
    ///
    /// # Errors
    ///
    /// Returns an error if a measurement lookup fails
    pub async fn compute_for(&self, goal: &Goal) -> AppResult<f64> {
        let Some(latest) = self.measurements.latest(goal.user_id).await? else {
            debug!(goal.id = %goal.id, user.id = %goal.user_id, "No measurements recorded; progress is 0");
            return Ok(0.0);
        };

        let baseline = self
            .measurements
            .latest_at_or_before(goal.user_id, goal.start_date)
            .await?;
        if baseline.is_none() {
            debug!(
                goal.id = %goal.id,
                user.id = %goal.user_id,
                start_date = %goal.start_date,
                "No measurement on or before goal start; progress is 0"
            );
        }

        Ok(compute_progress(goal, baseline.as_ref(), Some(&latest)))
    }

    /// Recompute, store, and return a goal's progress
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the goal does not exist or belongs to
    /// another user, or any store error unchanged
    pub async fn update_goal_progress(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<Goal> {
        let mut goal = self
            .goals
            .get(goal_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Goal"))?;

        let progress = round_progress(self.compute_for(&goal).await?);
        let transition = apply_progress(&mut goal, progress, self.clock.today());

        let saved = self.goals.save(&goal).await?;

        AppLogger::log_goal_progress(
            &user_id.to_string(),
            &goal_id.to_string(),
            progress,
            transition == CompletionTransition::Completed,
        );

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BodyMeasurement;
    use crate::models::{Circumferences, Skinfolds};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeMeasurements {
        snapshots: Vec<BodyMeasurement>,
    }

    #[async_trait]
    impl MeasurementStore for FakeMeasurements {
        async fn latest(&self, user_id: Uuid) -> AppResult<Option<BodyMeasurement>> {
            Ok(self
                .snapshots
                .iter()
                .filter(|s| s.user_id == user_id)
                .max_by_key(|s| (s.measurement_date, s.created_at))
                .cloned())
        }

        async fn latest_at_or_before(
            &self,
            user_id: Uuid,
            date: NaiveDate,
        ) -> AppResult<Option<BodyMeasurement>> {
            Ok(self
                .snapshots
                .iter()
                .filter(|s| s.user_id == user_id && s.measurement_date <= date)
                .max_by_key(|s| (s.measurement_date, s.created_at))
                .cloned())
        }
    }

    #[derive(Default)]
    struct FakeGoals {
        goals: Mutex<Vec<Goal>>,
    }

    #[async_trait]
    impl GoalStore for FakeGoals {
        async fn get(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<Option<Goal>> {
            Ok(self
                .goals
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.id == goal_id && g.user_id == user_id)
                .cloned())
        }

        async fn save(&self, goal: &Goal) -> AppResult<Goal> {
            let mut goals = self.goals.lock().unwrap();
            let slot = goals.iter_mut().find(|g| g.id == goal.id).unwrap();
            *slot = goal.clone();
            Ok(goal.clone())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot(user_id: Uuid, on: NaiveDate, weight: f64) -> BodyMeasurement {
        let created = Utc.from_utc_datetime(&on.and_hms_opt(7, 0, 0).unwrap());
        BodyMeasurement {
            id: Uuid::new_v4(),
            user_id,
            measurement_date: on,
            weight_kg: weight,
            body_fat_percentage: None,
            muscle_mass_kg: None,
            bmi: None,
            circumferences: Circumferences::default(),
            skinfolds: Skinfolds::default(),
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn weight_goal(user_id: Uuid, target: f64) -> Goal {
        let mut goal = Goal::new(
            user_id,
            "weight_loss".to_owned(),
            "Reach target".to_owned(),
            date(2024, 1, 10),
        );
        goal.target_weight_kg = Some(target);
        goal
    }

    fn engine(
        snapshots: Vec<BodyMeasurement>,
        goal: &Goal,
        today: NaiveDate,
    ) -> GoalProgressEngine<FakeMeasurements, FakeGoals> {
        GoalProgressEngine::with_clock(
            FakeMeasurements { snapshots },
            FakeGoals {
                goals: Mutex::new(vec![goal.clone()]),
            },
            Arc::new(FixedClock(today)),
        )
    }

    #[tokio::test]
    async fn test_halfway_to_weight_target() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 80.0);
        let engine = engine(
            vec![
                snapshot(user, date(2024, 1, 10), 90.0),
                snapshot(user, date(2024, 2, 10), 85.0),
            ],
            &goal,
            date(2024, 2, 11),
        );

        let updated = engine.update_goal_progress(goal.id, user).await.unwrap();
        assert_eq!(updated.current_progress, Some(50.0));
        assert!(!updated.is_completed);
        assert!(updated.completed_date.is_none());
    }

    #[tokio::test]
    async fn test_no_baseline_means_zero() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 80.0);
        let engine = engine(
            vec![snapshot(user, date(2024, 2, 1), 80.0)],
            &goal,
            date(2024, 2, 2),
        );

        let updated = engine.update_goal_progress(goal.id, user).await.unwrap();
        assert_eq!(updated.current_progress, Some(0.0));
        assert!(!updated.is_completed);
    }

    #[tokio::test]
    async fn test_no_measurements_means_zero() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 80.0);
        let engine = engine(Vec::new(), &goal, date(2024, 2, 2));
        assert!(engine.compute_for(&goal).await.unwrap().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_target_equal_to_baseline_completes_immediately() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 90.0);
        let today = date(2024, 1, 10);
        let engine = engine(vec![snapshot(user, date(2024, 1, 5), 90.0)], &goal, today);

        let updated = engine.update_goal_progress(goal.id, user).await.unwrap();
        assert_eq!(updated.current_progress, Some(100.0));
        assert!(updated.is_completed);
        assert_eq!(updated.completed_date, Some(today));
    }

    #[tokio::test]
    async fn test_overshoot_clamps_and_completes() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 80.0);
        let today = date(2024, 4, 1);
        let engine = engine(
            vec![
                snapshot(user, date(2024, 1, 1), 90.0),
                snapshot(user, date(2024, 3, 30), 70.0),
            ],
            &goal,
            today,
        );

        let updated = engine.update_goal_progress(goal.id, user).await.unwrap();
        assert_eq!(updated.current_progress, Some(100.0));
        assert!(updated.is_completed);
        assert_eq!(updated.completed_date, Some(today));
    }

    #[tokio::test]
    async fn test_completion_is_sticky_after_regression() {
        let user = Uuid::new_v4();
        let mut goal = weight_goal(user, 80.0);
        goal.is_completed = true;
        goal.completed_date = Some(date(2024, 1, 1));

        let engine = engine(
            vec![
                snapshot(user, date(2024, 1, 10), 90.0),
                snapshot(user, date(2024, 5, 1), 86.0),
            ],
            &goal,
            date(2024, 5, 2),
        );

        let updated = engine.update_goal_progress(goal.id, user).await.unwrap();
        assert_eq!(updated.current_progress, Some(40.0));
        assert!(updated.is_completed);
        assert_eq!(updated.completed_date, Some(date(2024, 1, 1)));
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 80.0);
        let engine = engine(
            vec![
                snapshot(user, date(2024, 1, 10), 90.0),
                snapshot(user, date(2024, 2, 1), 87.0),
            ],
            &goal,
            date(2024, 2, 2),
        );

        let first = engine.update_goal_progress(goal.id, user).await.unwrap();
        let second = engine.update_goal_progress(goal.id, user).await.unwrap();
        assert_eq!(first.current_progress, second.current_progress);
        assert_eq!(first.is_completed, second.is_completed);
    }

    #[tokio::test]
    async fn test_foreign_goal_is_not_found() {
        let owner = Uuid::new_v4();
        let goal = weight_goal(owner, 80.0);
        let engine = engine(Vec::new(), &goal, date(2024, 1, 1));

        let error = engine
            .update_goal_progress(goal.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), 404);
        assert_eq!(error.message, "Goal not found");
    }

    #[tokio::test]
    async fn test_same_day_snapshots_use_later_insert() {
        let user = Uuid::new_v4();
        let goal = weight_goal(user, 80.0);
        let mut early = snapshot(user, date(2024, 1, 10), 95.0);
        let mut late = snapshot(user, date(2024, 1, 10), 90.0);
        early.created_at -= Duration::hours(1);
        late.created_at += Duration::hours(1);
        let engine = engine(
            vec![late, early, snapshot(user, date(2024, 2, 1), 85.0)],
            &goal,
            date(2024, 2, 2),
        );

        let progress = engine.compute_for(&goal).await.unwrap();
        assert!((progress - 50.0).abs() < f64::EPSILON);
    }
}
