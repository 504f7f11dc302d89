// ABOUTME: Workout and exercise database operations
// ABOUTME: Workouts are written together with their exercises in a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::rows::{
    format_date, format_timestamp, get_date, get_optional_enum, get_timestamp, get_uuid,
};
use super::Database;
use crate::constants::validation;
use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, ExerciseType, Feeling, Intensity, Workout};
use crate::validation::{check_len, check_optional_range, Validate};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const WORKOUT_COLUMNS: &str = r"
    id, user_id, workout_date, workout_type, duration_minutes, calories_burned,
    intensity, feeling, notes, created_at, updated_at
";

const EXERCISE_COLUMNS: &str = r"
    id, workout_id, exercise_name, exercise_type, sets, reps, weight_kg, rest_seconds,
    distance_km, duration_minutes, order_index, notes, created_at
";

impl Database {
    /// Create the workouts and exercises tables
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        self.execute_schema(
            "workouts",
            &[
                r"
                CREATE TABLE IF NOT EXISTS workouts (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    workout_date TEXT NOT NULL,
                    workout_type TEXT NOT NULL,
                    duration_minutes INTEGER,
                    calories_burned INTEGER,
                    intensity TEXT CHECK (intensity IN ('low', 'medium', 'high')),
                    feeling TEXT CHECK (feeling IN ('great', 'good', 'ok', 'tired', 'exhausted')),
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, workout_date)",
            ],
        )
        .await?;

        self.execute_schema(
            "exercises",
            &[
                r"
                CREATE TABLE IF NOT EXISTS exercises (
                    id TEXT PRIMARY KEY,
                    workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                    exercise_name TEXT NOT NULL,
                    exercise_type TEXT CHECK (exercise_type IN ('compound', 'isolation', 'cardio')),
                    sets INTEGER,
                    reps INTEGER,
                    weight_kg REAL,
                    rest_seconds INTEGER,
                    distance_km REAL,
                    duration_minutes INTEGER,
                    order_index INTEGER NOT NULL DEFAULT 0,
                    notes TEXT,
                    created_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_exercises_workout ON exercises(workout_id, order_index)",
            ],
        )
        .await
    }
}

/// One exercise inside a new workout
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExerciseRequest {
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
    #[serde(default)]
    pub order_index: i32,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Validate for CreateExerciseRequest {
    fn validate(&self) -> AppResult<()> {
        check_len(
            "exercise_name",
            &self.exercise_name,
            &validation::EXERCISE_NAME_LEN,
        )?;
        check_optional_range("sets", self.sets.map(i64::from), &validation::SETS)?;
        check_optional_range("reps", self.reps.map(i64::from), &validation::REPS)?;
        check_optional_range("weight_kg", self.weight_kg, &validation::LOAD_KG)?;
        check_optional_range(
            "rest_seconds",
            self.rest_seconds.map(i64::from),
            &validation::REST_SECONDS,
        )?;
        check_optional_range("distance_km", self.distance_km, &validation::DISTANCE_KM)?;
        check_optional_range(
            "duration_minutes",
            self.duration_minutes.map(i64::from),
            &validation::DURATION_MINUTES,
        )?;
        if self.order_index < 0 {
            return Err(AppError::invalid_input("order_index must be non-negative"));
        }
        Ok(())
    }
}

/// New workout with its exercises
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkoutRequest {
    /// Session date
    pub workout_date: NaiveDate,
    /// Free-form session label
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
    /// Exercises performed
    #[serde(default)]
    pub exercises: Vec<CreateExerciseRequest>,
}

impl Validate for CreateWorkoutRequest {
    fn validate(&self) -> AppResult<()> {
        check_len(
            "workout_type",
            &self.workout_type,
            &validation::WORKOUT_TYPE_LEN,
        )?;
        check_workout_numbers(self.duration_minutes, self.calories_burned)?;
        self.exercises.iter().try_for_each(Validate::validate)
    }
}

/// Partial workout update; exercises are not editable through it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkoutRequest {
    /// New session label
    pub workout_type: Option<String>,
    /// New session length
    pub duration_minutes: Option<i32>,
    /// New calories burned
    pub calories_burned: Option<i32>,
    /// New intensity
    pub intensity: Option<Intensity>,
    /// New feeling
    pub feeling: Option<Feeling>,
    /// New notes
    pub notes: Option<String>,
}

impl Validate for UpdateWorkoutRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(workout_type) = &self.workout_type {
            check_len("workout_type", workout_type, &validation::WORKOUT_TYPE_LEN)?;
        }
        check_workout_numbers(self.duration_minutes, self.calories_burned)
    }
}

fn check_workout_numbers(
    duration_minutes: Option<i32>,
    calories_burned: Option<i32>,
) -> AppResult<()> {
    check_optional_range(
        "duration_minutes",
        duration_minutes.map(i64::from),
        &validation::DURATION_MINUTES,
    )?;
    check_optional_range(
        "calories_burned",
        calories_burned.map(i64::from),
        &validation::CALORIES_BURNED,
    )
}

/// Filter options for listing workouts
#[derive(Debug, Clone)]
pub struct ListWorkoutsFilter {
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Exact workout type
    pub workout_type: Option<String>,
    /// Maximum number of results
    pub limit: u32,
}

/// Workout database operations manager
pub struct WorkoutsManager {
    pool: SqlitePool,
}

impl WorkoutsManager {
    /// Create a new workouts manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a workout and all of its exercises atomically
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case
    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateWorkoutRequest,
    ) -> AppResult<Workout> {
        let now = Utc::now();
        let workout_id = Uuid::new_v4();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO workouts (
                id, user_id, workout_date, workout_type, duration_minutes, calories_burned,
                intensity, feeling, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(workout_id.to_string())
        .bind(user_id.to_string())
        .bind(format_date(request.workout_date))
        .bind(&request.workout_type)
        .bind(request.duration_minutes)
        .bind(request.calories_burned)
        .bind(request.intensity.map(|i| i.as_str()))
        .bind(request.feeling.map(|f| f.as_str()))
        .bind(&request.notes)
        .bind(format_timestamp(&now))
        .bind(format_timestamp(&now))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout: {e}")))?;

        let mut exercises = Vec::with_capacity(request.exercises.len());
        for exercise in &request.exercises {
            let exercise = build_exercise(workout_id, exercise, now);

            sqlx::query(
                r"
                INSERT INTO exercises (
                    id, workout_id, exercise_name, exercise_type, sets, reps, weight_kg,
                    rest_seconds, distance_km, duration_minutes, order_index, notes, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ",
            )
            .bind(exercise.id.to_string())
            .bind(workout_id.to_string())
            .bind(&exercise.exercise_name)
            .bind(exercise.exercise_type.map(|t| t.as_str()))
            .bind(exercise.sets)
            .bind(exercise.reps)
            .bind(exercise.weight_kg)
            .bind(exercise.rest_seconds)
            .bind(exercise.distance_km)
            .bind(exercise.duration_minutes)
            .bind(exercise.order_index)
            .bind(&exercise.notes)
            .bind(format_timestamp(&exercise.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?;

            exercises.push(exercise);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit workout: {e}")))?;

        exercises.sort_by_key(|e| e.order_index);

        Ok(Workout {
            id: workout_id,
            user_id,
            workout_date: request.workout_date,
            workout_type: request.workout_type.clone(),
            duration_minutes: request.duration_minutes,
            calories_burned: request.calories_burned,
            intensity: request.intensity,
            feeling: request.feeling,
            notes: request.notes.clone(),
            exercises,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a workout owned by the user, with its exercises
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Workout>> {
        let row = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut workout = row_to_workout(&row)?;
        workout.exercises = self.exercises_for(workout.id).await?;
        Ok(Some(workout))
    }

    /// List a user's workouts, newest first, with their exercises
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &ListWorkoutsFilter,
    ) -> AppResult<Vec<Workout>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {WORKOUT_COLUMNS} FROM workouts
            WHERE user_id = $1
              AND ($2 IS NULL OR workout_date >= $2)
              AND ($3 IS NULL OR workout_date <= $3)
              AND ($4 IS NULL OR workout_type = $4)
            ORDER BY workout_date DESC, created_at DESC
            LIMIT $5
            "
        ))
        .bind(user_id.to_string())
        .bind(filter.start_date.map(format_date))
        .bind(filter.end_date.map(format_date))
        .bind(filter.workout_type.as_deref())
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        let mut workouts = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut workout = row_to_workout(row)?;
            workout.exercises = self.exercises_for(workout.id).await?;
            workouts.push(workout);
        }
        Ok(workouts)
    }

    /// Apply a partial update to the workout's own fields
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateWorkoutRequest,
    ) -> AppResult<Option<Workout>> {
        let Some(existing) = self.get(id, user_id).await? else {
            return Ok(None);
        };

        let workout_type = request
            .workout_type
            .as_ref()
            .unwrap_or(&existing.workout_type);
        let duration_minutes = request.duration_minutes.or(existing.duration_minutes);
        let calories_burned = request.calories_burned.or(existing.calories_burned);
        let intensity = request.intensity.or(existing.intensity);
        let feeling = request.feeling.or(existing.feeling);
        let notes = request.notes.as_deref().or(existing.notes.as_deref());

        let result = sqlx::query(
            r"
            UPDATE workouts SET
                workout_type = $1, duration_minutes = $2, calories_burned = $3,
                intensity = $4, feeling = $5, notes = $6, updated_at = $7
            WHERE id = $8 AND user_id = $9
            ",
        )
        .bind(workout_type)
        .bind(duration_minutes)
        .bind(calories_burned)
        .bind(intensity.map(|i| i.as_str()))
        .bind(feeling.map(|f| f.as_str()))
        .bind(notes)
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id, user_id).await
    }

    /// Delete a workout owned by the user; its exercises cascade
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exercises_for(&self, workout_id: Uuid) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {EXERCISE_COLUMNS} FROM exercises
            WHERE workout_id = $1
            ORDER BY order_index ASC, rowid ASC
            "
        ))
        .bind(workout_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }
}

fn build_exercise(
    workout_id: Uuid,
    request: &CreateExerciseRequest,
    created_at: DateTime<Utc>,
) -> Exercise {
    Exercise {
        id: Uuid::new_v4(),
        workout_id,
        exercise_name: request.exercise_name.clone(),
        exercise_type: request.exercise_type,
        sets: request.sets,
        reps: request.reps,
        weight_kg: request.weight_kg,
        rest_seconds: request.rest_seconds,
        distance_km: request.distance_km,
        duration_minutes: request.duration_minutes,
        order_index: request.order_index,
        notes: request.notes.clone(),
        created_at,
    }
}

fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
    Ok(Workout {
        id: get_uuid(row, "id")?,
        user_id: get_uuid(row, "user_id")?,
        workout_date: get_date(row, "workout_date")?,
        workout_type: row.get("workout_type"),
        duration_minutes: row.get("duration_minutes"),
        calories_burned: row.get("calories_burned"),
        intensity: get_optional_enum(row, "intensity", Intensity::parse)?,
        feeling: get_optional_enum(row, "feeling", Feeling::parse)?,
        notes: row.get("notes"),
        exercises: Vec::new(),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    Ok(Exercise {
        id: get_uuid(row, "id")?,
        workout_id: get_uuid(row, "workout_id")?,
        exercise_name: row.get("exercise_name"),
        exercise_type: get_optional_enum(row, "exercise_type", ExerciseType::parse)?,
        sets: row.get("sets"),
        reps: row.get("reps"),
        weight_kg: row.get("weight_kg"),
        rest_seconds: row.get("rest_seconds"),
        distance_km: row.get("distance_km"),
        duration_minutes: row.get("duration_minutes"),
        order_index: row.get("order_index"),
        notes: row.get("notes"),
        created_at: get_timestamp(row, "created_at")?,
    })
}
