// ABOUTME: Narrow storage traits the goal progress engine depends on
// ABOUTME: Implemented by the SQLite managers and by in-memory fakes in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::{GoalsManager, MeasurementsManager};
use crate::errors::AppResult;
use crate::models::{BodyMeasurement, Goal};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Read access to a user's measurement time series
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// The user's most recent snapshot by date, ties going to the later insert
    async fn latest(&self, user_id: Uuid) -> AppResult<Option<BodyMeasurement>>;

    /// The user's most recent snapshot dated on or before `date`
    async fn latest_at_or_before(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>>;
}

/// Load and persist goals
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Goal by id, scoped to its owner
    async fn get(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<Option<Goal>>;

    /// Persist the engine-owned progress fields and return the stored goal
    async fn save(&self, goal: &Goal) -> AppResult<Goal>;
}

#[async_trait]
impl MeasurementStore for MeasurementsManager {
    async fn latest(&self, user_id: Uuid) -> AppResult<Option<BodyMeasurement>> {
        Self::latest(self, user_id).await
    }

    async fn latest_at_or_before(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>> {
        Self::latest_at_or_before(self, user_id, date).await
    }
}

#[async_trait]
impl GoalStore for GoalsManager {
    async fn get(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<Option<Goal>> {
        Self::get(self, goal_id, user_id).await
    }

    async fn save(&self, goal: &Goal) -> AppResult<Goal> {
        Self::save(self, goal).await
    }
}
