// ABOUTME: Domain computations over user data (goal progress, rounding helpers)
// ABOUTME: Pure functions with no I/O so they can be tested and benchmarked in isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

/// Goal progress computation and completion state transition
pub mod goal_progress;

pub use goal_progress::{
    apply_progress, baseline_snapshot, compute_progress, compute_progress_from_history,
    latest_snapshot, round_progress, select_metric, CompletionTransition, ProgressInputs,
    ProgressMetric, METRIC_PRIORITY,
};

/// Round half away from zero to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
