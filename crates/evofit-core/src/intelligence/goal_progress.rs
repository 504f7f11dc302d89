// ABOUTME: Goal progress computation from a user's body measurement time series
// ABOUTME: Baseline selection, metric priority, directional normalization, and sticky completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! # Goal Progress
//!
//! Progress is how far the latest snapshot has moved from the baseline snapshot
//! toward the goal's target, as a percentage in `[0, 100]`.
//!
//! - The **baseline** is the latest snapshot dated on or before `goal.start_date`.
//! - Exactly one metric drives progress, chosen by [`METRIC_PRIORITY`]: the first
//!   whose target is set on the goal and whose value is present on both snapshots.
//! - `needed = target - start` carries the direction, so weight loss and muscle
//!   gain share one formula. Moving away from the target floors at 0, overshoot
//!   caps at 100.
//!
//! Missing data is not an error: no snapshots, no baseline, or no qualifying
//! metric all yield `0.0`.

use crate::constants::progress::{COMPLETE_PROGRESS, MIN_PROGRESS, PROGRESS_DECIMALS};
use crate::intelligence::round_to;
use crate::models::{BodyMeasurement, Goal};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Body-composition metric a goal can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMetric {
    /// `target_weight_kg` against `weight_kg`
    Weight,
    /// `target_body_fat_percentage` against `body_fat_percentage`
    BodyFatPercentage,
    /// `target_muscle_mass_kg` against `muscle_mass_kg`
    MuscleMass,
}

/// Fixed evaluation order when a goal declares more than one target
pub const METRIC_PRIORITY: [ProgressMetric; 3] = [
    ProgressMetric::Weight,
    ProgressMetric::BodyFatPercentage,
    ProgressMetric::MuscleMass,
];

impl ProgressMetric {
    /// Field name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weight => "weight_kg",
            Self::BodyFatPercentage => "body_fat_percentage",
            Self::MuscleMass => "muscle_mass_kg",
        }
    }

    /// The goal's declared target for this metric
    #[must_use]
    pub const fn target(self, goal: &Goal) -> Option<f64> {
        match self {
            Self::Weight => goal.target_weight_kg,
            Self::BodyFatPercentage => goal.target_body_fat_percentage,
            Self::MuscleMass => goal.target_muscle_mass_kg,
        }
    }

    /// The snapshot's recorded value for this metric
    #[must_use]
    pub const fn value(self, snapshot: &BodyMeasurement) -> Option<f64> {
        match self {
            Self::Weight => Some(snapshot.weight_kg),
            Self::BodyFatPercentage => snapshot.body_fat_percentage,
            Self::MuscleMass => snapshot.muscle_mass_kg,
        }
    }
}

/// Fully-populated inputs for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressInputs {
    /// Metric that qualified
    pub metric: ProgressMetric,
    /// Baseline value
    pub start: f64,
    /// Latest value
    pub current: f64,
    /// Declared target
    pub target: f64,
}

impl ProgressInputs {
    /// Clamped percentage of the distance covered from `start` toward `target`
    // Exact comparison: only a target identical to the baseline is degenerate
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn percentage(&self) -> f64 {
        let needed = self.target - self.start;
        if needed == 0.0 {
            return COMPLETE_PROGRESS;
        }

        let achieved = self.current - self.start;
        let raw = achieved / needed * 100.0;
        if raw.is_nan() {
            return MIN_PROGRESS;
        }
        raw.clamp(MIN_PROGRESS, COMPLETE_PROGRESS)
    }
}

/// First metric in priority order with a target and values on both snapshots
#[must_use]
pub fn select_metric(
    goal: &Goal,
    baseline: &BodyMeasurement,
    latest: &BodyMeasurement,
) -> Option<ProgressInputs> {
    METRIC_PRIORITY.iter().find_map(|&metric| {
        Some(ProgressInputs {
            metric,
            target: metric.target(goal)?,
            start: metric.value(baseline)?,
            current: metric.value(latest)?,
        })
    })
}

/// Progress for a goal given its baseline and latest snapshots
///
/// Always returns a finite value in `[0, 100]`.
#[must_use]
pub fn compute_progress(
    goal: &Goal,
    baseline: Option<&BodyMeasurement>,
    latest: Option<&BodyMeasurement>,
) -> f64 {
    let (Some(baseline), Some(latest)) = (baseline, latest) else {
        return MIN_PROGRESS;
    };

    select_metric(goal, baseline, latest).map_or(MIN_PROGRESS, |inputs| inputs.percentage())
}

/// Progress for a goal computed directly over a user's snapshot history
///
/// The history need not be sorted.
#[must_use]
pub fn compute_progress_from_history(goal: &Goal, history: &[BodyMeasurement]) -> f64 {
    compute_progress(
        goal,
        baseline_snapshot(history, goal.start_date),
        latest_snapshot(history),
    )
}

/// Order by date, then by creation time; full ties resolve to the later slice position
fn snapshot_order(a: &BodyMeasurement, b: &BodyMeasurement) -> Ordering {
    a.measurement_date
        .cmp(&b.measurement_date)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Snapshot with the greatest date
#[must_use]
pub fn latest_snapshot(history: &[BodyMeasurement]) -> Option<&BodyMeasurement> {
    history.iter().max_by(|a, b| snapshot_order(a, b))
}

/// Snapshot with the greatest date on or before `start_date`
#[must_use]
pub fn baseline_snapshot(
    history: &[BodyMeasurement],
    start_date: NaiveDate,
) -> Option<&BodyMeasurement> {
    history
        .iter()
        .filter(|snapshot| snapshot.measurement_date <= start_date)
        .max_by(|a, b| snapshot_order(a, b))
}

/// Round a percentage to the persisted precision
#[must_use]
pub fn round_progress(progress: f64) -> f64 {
    round_to(progress, PROGRESS_DECIMALS)
}

/// Outcome of applying a freshly computed progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTransition {
    /// The goal moved from incomplete to completed
    Completed,
    /// Completion state did not change
    Unchanged,
}

/// Record `progress` on the goal and complete it on first reaching 100
///
/// Completion is one-directional: a later lower value updates
/// `current_progress` but never clears `is_completed` or `completed_date`.
pub fn apply_progress(goal: &mut Goal, progress: f64, today: NaiveDate) -> CompletionTransition {
    goal.current_progress = Some(progress);

    if progress >= COMPLETE_PROGRESS && !goal.is_completed {
        goal.is_completed = true;
        goal.completed_date = Some(today);
        return CompletionTransition::Completed;
    }

    CompletionTransition::Unchanged
}
