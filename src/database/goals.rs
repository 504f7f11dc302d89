// ABOUTME: Goal database operations including the engine's persisted progress fields
// ABOUTME: CRUD with filtered listing, direct completion overrides, and progress saves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::rows::{
    format_date, format_timestamp, get_bool, get_date, get_optional_date, get_timestamp, get_uuid,
};
use super::Database;
use crate::constants::validation;
use crate::errors::{AppError, AppResult};
use crate::models::Goal;
use crate::validation::{check_len, check_max_len, check_optional_range, Validate};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const GOAL_COLUMNS: &str = r"
    id, user_id, goal_type, title, description, target_weight_kg, target_body_fat_percentage,
    target_muscle_mass_kg, target_value, target_unit, start_date, target_date, completed_date,
    is_completed, is_active, current_progress, notes, created_at, updated_at
";

impl Database {
    /// Create the goals table
    pub(super) async fn migrate_goals(&self) -> AppResult<()> {
        self.execute_schema(
            "goals",
            &[
                r"
                CREATE TABLE IF NOT EXISTS goals (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    goal_type TEXT NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT,
                    target_weight_kg REAL,
                    target_body_fat_percentage REAL,
                    target_muscle_mass_kg REAL,
                    target_value REAL,
                    target_unit TEXT,
                    start_date TEXT NOT NULL,
                    target_date TEXT,
                    completed_date TEXT,
                    is_completed INTEGER NOT NULL DEFAULT 0,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    current_progress REAL,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_goals_user_created ON goals(user_id, created_at)",
            ],
        )
        .await
    }
}

/// New goal declaration
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalRequest {
    /// Free-form category label
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
    /// Free-form numeric target
    pub target_value: Option<f64>,
    /// Unit for `target_value`
    pub target_unit: Option<String>,
    /// Day progress is measured from
    pub start_date: NaiveDate,
    /// Optional deadline
    pub target_date: Option<NaiveDate>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Validate for CreateGoalRequest {
    fn validate(&self) -> AppResult<()> {
        check_len("goal_type", &self.goal_type, &validation::GOAL_TYPE_LEN)?;
        check_len("title", &self.title, &validation::GOAL_TITLE_LEN)?;
        check_max_len(
            "target_unit",
            self.target_unit.as_deref(),
            validation::GOAL_UNIT_MAX_LEN,
        )?;
        check_targets(
            self.target_weight_kg,
            self.target_body_fat_percentage,
            self.target_muscle_mass_kg,
        )
    }
}

impl CreateGoalRequest {
    /// Build the goal this request describes
    #[must_use]
    pub fn into_goal(self, user_id: Uuid) -> Goal {
        let mut goal = Goal::new(user_id, self.goal_type, self.title, self.start_date);
        goal.description = self.description;
        goal.target_weight_kg = self.target_weight_kg;
        goal.target_body_fat_percentage = self.target_body_fat_percentage;
        goal.target_muscle_mass_kg = self.target_muscle_mass_kg;
        goal.target_value = self.target_value;
        goal.target_unit = self.target_unit;
        goal.target_date = self.target_date;
        goal.notes = self.notes;
        goal
    }
}

/// Partial goal update, including direct overrides of derived progress state
///
/// Nullable fields use a nested `Option`: an absent key leaves the stored value,
/// an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoalRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New weight target
    #[serde(default, deserialize_with = "nullable")]
    pub target_weight_kg: Option<Option<f64>>,
    /// New body fat target
    #[serde(default, deserialize_with = "nullable")]
    pub target_body_fat_percentage: Option<Option<f64>>,
    /// New muscle mass target
    #[serde(default, deserialize_with = "nullable")]
    pub target_muscle_mass_kg: Option<Option<f64>>,
    /// New free-form target
    #[serde(default, deserialize_with = "nullable")]
    pub target_value: Option<Option<f64>>,
    /// New deadline
    #[serde(default, deserialize_with = "nullable")]
    pub target_date: Option<Option<NaiveDate>>,
    /// Progress override
    #[serde(default, deserialize_with = "nullable")]
    pub current_progress: Option<Option<f64>>,
    /// Completion override
    pub is_completed: Option<bool>,
    /// Archive or restore
    pub is_active: Option<bool>,
    /// New notes
    pub notes: Option<String>,
}

/// Present keys (including `null`) become `Some`; `#[serde(default)]` covers absent ones
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Validate for UpdateGoalRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(title) = &self.title {
            check_len("title", title, &validation::GOAL_TITLE_LEN)?;
        }
        check_optional_range(
            "current_progress",
            self.current_progress.flatten(),
            &validation::PROGRESS_PERCENT,
        )?;
        check_targets(
            self.target_weight_kg.flatten(),
            self.target_body_fat_percentage.flatten(),
            self.target_muscle_mass_kg.flatten(),
        )
    }
}

fn check_targets(
    weight_kg: Option<f64>,
    body_fat_percentage: Option<f64>,
    muscle_mass_kg: Option<f64>,
) -> AppResult<()> {
    check_optional_range("target_weight_kg", weight_kg, &validation::WEIGHT_KG)?;
    check_optional_range(
        "target_body_fat_percentage",
        body_fat_percentage,
        &validation::BODY_FAT_PERCENTAGE,
    )?;
    check_optional_range(
        "target_muscle_mass_kg",
        muscle_mass_kg,
        &validation::MUSCLE_MASS_KG,
    )
}

/// Filter options for listing goals
#[derive(Debug, Clone)]
pub struct ListGoalsFilter {
    /// Exact goal type
    pub goal_type: Option<String>,
    /// Archival state
    pub is_active: Option<bool>,
    /// Completion state
    pub is_completed: Option<bool>,
    /// Maximum number of results
    pub limit: u32,
}

/// Goal database operations manager
pub struct GoalsManager {
    pool: SqlitePool,
}

impl GoalsManager {
    /// Create a new goals manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new goal
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, goal: &Goal) -> AppResult<Goal> {
        sqlx::query(
            r"
            INSERT INTO goals (
                id, user_id, goal_type, title, description, target_weight_kg,
                target_body_fat_percentage, target_muscle_mass_kg, target_value, target_unit,
                start_date, target_date, completed_date, is_completed, is_active,
                current_progress, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(&goal.goal_type)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.target_weight_kg)
        .bind(goal.target_body_fat_percentage)
        .bind(goal.target_muscle_mass_kg)
        .bind(goal.target_value)
        .bind(&goal.target_unit)
        .bind(format_date(goal.start_date))
        .bind(goal.target_date.map(format_date))
        .bind(goal.completed_date.map(format_date))
        .bind(goal.is_completed)
        .bind(goal.is_active)
        .bind(goal.current_progress)
        .bind(&goal.notes)
        .bind(format_timestamp(&goal.created_at))
        .bind(format_timestamp(&goal.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create goal: {e}")))?;

        Ok(goal.clone())
    }

    /// Get a goal owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Goal>> {
        let row = sqlx::query(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get goal: {e}")))?;

        row.map(|r| row_to_goal(&r)).transpose()
    }

    /// List a user's goals, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, user_id: Uuid, filter: &ListGoalsFilter) -> AppResult<Vec<Goal>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {GOAL_COLUMNS} FROM goals
            WHERE user_id = $1
              AND ($2 IS NULL OR goal_type = $2)
              AND ($3 IS NULL OR is_active = $3)
              AND ($4 IS NULL OR is_completed = $4)
            ORDER BY created_at DESC, rowid DESC
            LIMIT $5
            "
        ))
        .bind(user_id.to_string())
        .bind(filter.goal_type.as_deref())
        .bind(filter.is_active)
        .bind(filter.is_completed)
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list goals: {e}")))?;

        rows.iter().map(row_to_goal).collect()
    }

    /// Apply a partial update
    ///
    /// Marking an incomplete goal completed stamps `completed_date` with `today`,
    /// replacing any date left from an earlier completion. Clearing completion
    /// leaves `completed_date` as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateGoalRequest,
        today: NaiveDate,
    ) -> AppResult<Option<Goal>> {
        let Some(mut goal) = self.get(id, user_id).await? else {
            return Ok(None);
        };

        if let Some(title) = &request.title {
            goal.title.clone_from(title);
        }
        if request.description.is_some() {
            goal.description.clone_from(&request.description);
        }
        if let Some(target_weight_kg) = request.target_weight_kg {
            goal.target_weight_kg = target_weight_kg;
        }
        if let Some(target_body_fat_percentage) = request.target_body_fat_percentage {
            goal.target_body_fat_percentage = target_body_fat_percentage;
        }
        if let Some(target_muscle_mass_kg) = request.target_muscle_mass_kg {
            goal.target_muscle_mass_kg = target_muscle_mass_kg;
        }
        if let Some(target_value) = request.target_value {
            goal.target_value = target_value;
        }
        if let Some(target_date) = request.target_date {
            goal.target_date = target_date;
        }
        if let Some(current_progress) = request.current_progress {
            goal.current_progress = current_progress;
        }
        if request.notes.is_some() {
            goal.notes.clone_from(&request.notes);
        }
        if let Some(is_active) = request.is_active {
            goal.is_active = is_active;
        }
        match request.is_completed {
            Some(true) => goal.mark_completed(today),
            Some(false) => goal.is_completed = false,
            None => {}
        }

        let result = sqlx::query(
            r"
            UPDATE goals SET
                title = $1, description = $2, target_weight_kg = $3,
                target_body_fat_percentage = $4, target_muscle_mass_kg = $5, target_value = $6,
                target_date = $7, current_progress = $8, is_completed = $9, completed_date = $10,
                is_active = $11, notes = $12, updated_at = $13
            WHERE id = $14 AND user_id = $15
            ",
        )
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.target_weight_kg)
        .bind(goal.target_body_fat_percentage)
        .bind(goal.target_muscle_mass_kg)
        .bind(goal.target_value)
        .bind(goal.target_date.map(format_date))
        .bind(goal.current_progress)
        .bind(goal.is_completed)
        .bind(goal.completed_date.map(format_date))
        .bind(goal.is_active)
        .bind(&goal.notes)
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update goal: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id, user_id).await
    }

    /// Persist the progress fields the engine owns
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the goal disappeared, or an error if database operation fails
    pub async fn save(&self, goal: &Goal) -> AppResult<Goal> {
        let result = sqlx::query(
            r"
            UPDATE goals SET
                current_progress = $1, is_completed = $2, completed_date = $3, updated_at = $4
            WHERE id = $5 AND user_id = $6
            ",
        )
        .bind(goal.current_progress)
        .bind(goal.is_completed)
        .bind(goal.completed_date.map(format_date))
        .bind(format_timestamp(&Utc::now()))
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save goal progress: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Goal"));
        }

        self.get(goal.id, goal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Goal"))
    }

    /// Delete a goal owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete goal: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_goal(row: &SqliteRow) -> AppResult<Goal> {
    Ok(Goal {
        id: get_uuid(row, "id")?,
        user_id: get_uuid(row, "user_id")?,
        goal_type: row.get("goal_type"),
        title: row.get("title"),
        description: row.get("description"),
        target_weight_kg: row.get("target_weight_kg"),
        target_body_fat_percentage: row.get("target_body_fat_percentage"),
        target_muscle_mass_kg: row.get("target_muscle_mass_kg"),
        target_value: row.get("target_value"),
        target_unit: row.get("target_unit"),
        start_date: get_date(row, "start_date")?,
        target_date: get_optional_date(row, "target_date")?,
        completed_date: get_optional_date(row, "completed_date")?,
        is_completed: get_bool(row, "is_completed"),
        is_active: get_bool(row, "is_active"),
        current_progress: row.get("current_progress"),
        notes: row.get("notes"),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    async fn setup() -> (GoalsManager, Uuid) {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let user = User::new("g@example.com", "G".to_owned(), "hash".to_owned());
        db.users().create(&user).await.unwrap();
        (db.goals(), user.id)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn weight_goal(user_id: Uuid) -> Goal {
        let mut goal = Goal::new(
            user_id,
            "weight_loss".to_owned(),
            "Cut to 80".to_owned(),
            date(1, 1),
        );
        goal.target_weight_kg = Some(80.0);
        goal
    }

    fn filter() -> ListGoalsFilter {
        ListGoalsFilter {
            goal_type: None,
            is_active: None,
            is_completed: None,
            limit: 100,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let (goals, user_id) = setup().await;
        let goal = goals.create(&weight_goal(user_id)).await.unwrap();

        let stored = goals.get(goal.id, user_id).await.unwrap().unwrap();
        assert_eq!(stored.target_weight_kg, Some(80.0));
        assert!(stored.is_active);
        assert!(stored.current_progress.is_none());

        assert!(goals.get(goal.id, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (goals, user_id) = setup().await;
        goals.create(&weight_goal(user_id)).await.unwrap();
        let mut strength = Goal::new(
            user_id,
            "strength".to_owned(),
            "Bulk".to_owned(),
            date(1, 1),
        );
        strength.is_active = false;
        goals.create(&strength).await.unwrap();

        assert_eq!(goals.list(user_id, &filter()).await.unwrap().len(), 2);

        let active = goals
            .list(
                user_id,
                &ListGoalsFilter {
                    is_active: Some(true),
                    ..filter()
                },
            )
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].goal_type, "weight_loss");

        let typed = goals
            .list(
                user_id,
                &ListGoalsFilter {
                    goal_type: Some("strength".to_owned()),
                    ..filter()
                },
            )
            .await
            .unwrap();
        assert_eq!(typed.len(), 1);
        assert!(!typed[0].is_active);
    }

    #[tokio::test]
    async fn test_update_completion_override() {
        let (goals, user_id) = setup().await;
        let goal = goals.create(&weight_goal(user_id)).await.unwrap();

        let completed = goals
            .update(
                goal.id,
                user_id,
                &UpdateGoalRequest {
                    is_completed: Some(true),
                    ..UpdateGoalRequest::default()
                },
                date(3, 1),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(completed.is_completed);
        assert_eq!(completed.completed_date, Some(date(3, 1)));

        let reopened = goals
            .update(
                goal.id,
                user_id,
                &UpdateGoalRequest {
                    is_completed: Some(false),
                    ..UpdateGoalRequest::default()
                },
                date(4, 1),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!reopened.is_completed);
        assert_eq!(reopened.completed_date, Some(date(3, 1)));
    }

    #[tokio::test]
    async fn test_update_recompletion_restamps_date() {
        let (goals, user_id) = setup().await;
        let goal = goals.create(&weight_goal(user_id)).await.unwrap();
        let complete = UpdateGoalRequest {
            is_completed: Some(true),
            ..UpdateGoalRequest::default()
        };
        let reopen = UpdateGoalRequest {
            is_completed: Some(false),
            ..UpdateGoalRequest::default()
        };

        goals.update(goal.id, user_id, &complete, date(3, 1)).await.unwrap();
        goals.update(goal.id, user_id, &reopen, date(4, 1)).await.unwrap();
        let recompleted = goals
            .update(goal.id, user_id, &complete, date(5, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(recompleted.completed_date, Some(date(5, 1)));

        let again = goals
            .update(goal.id, user_id, &complete, date(6, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.completed_date, Some(date(5, 1)));
    }

    #[tokio::test]
    async fn test_update_null_clears_target() {
        let (goals, user_id) = setup().await;
        let goal = goals.create(&weight_goal(user_id)).await.unwrap();

        let request: UpdateGoalRequest = serde_json::from_str(
            r#"{"target_weight_kg": null, "target_body_fat_percentage": 15.0}"#,
        )
        .unwrap();
        assert_eq!(request.target_weight_kg, Some(None));
        assert!(request.target_date.is_none());

        let updated = goals
            .update(goal.id, user_id, &request, date(3, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.target_weight_kg, None);
        assert_eq!(updated.target_body_fat_percentage, Some(15.0));

        let untouched = goals
            .update(
                goal.id,
                user_id,
                &UpdateGoalRequest {
                    title: Some("Recomp".to_owned()),
                    ..UpdateGoalRequest::default()
                },
                date(3, 2),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.target_body_fat_percentage, Some(15.0));
    }

    #[tokio::test]
    async fn test_save_persists_progress_fields() {
        let (goals, user_id) = setup().await;
        let mut goal = goals.create(&weight_goal(user_id)).await.unwrap();
        goal.current_progress = Some(42.5);
        goal.title = "ignored by save".to_owned();

        let saved = goals.save(&goal).await.unwrap();
        assert_eq!(saved.current_progress, Some(42.5));
        assert_eq!(saved.title, "Cut to 80");

        let mut missing = weight_goal(user_id);
        missing.current_progress = Some(1.0);
        assert!(goals.save(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let (goals, user_id) = setup().await;
        let goal = goals.create(&weight_goal(user_id)).await.unwrap();
        assert!(!goals.delete(goal.id, Uuid::new_v4()).await.unwrap());
        assert!(goals.delete(goal.id, user_id).await.unwrap());
        assert!(goals.get(goal.id, user_id).await.unwrap().is_none());
    }

    #[test]
    fn test_progress_override_bounds() {
        let request = UpdateGoalRequest {
            current_progress: Some(Some(100.5)),
            ..UpdateGoalRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
