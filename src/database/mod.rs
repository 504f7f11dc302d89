// ABOUTME: SQLite persistence layer with one manager per table and schema migrations
// ABOUTME: Owns the connection pool and hands out per-domain managers that share it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! # Database Management
//!
//! All rows are keyed by text `UUID`s. Dates are stored as ISO `YYYY-MM-DD`
//! text and timestamps as fixed-width RFC 3339 text, so lexical and
//! chronological order agree. Booleans are stored as integers.

mod rows;

/// Goal storage
pub mod goals;
/// Meal storage
pub mod meals;
/// Body measurement storage
pub mod measurements;
/// Progress photo metadata storage
pub mod progress_photos;
/// Collaborator traits consumed by the goal progress engine
pub mod stores;
/// User account storage
pub mod users;
/// Workout and exercise storage
pub mod workouts;

pub use goals::{CreateGoalRequest, GoalsManager, ListGoalsFilter, UpdateGoalRequest};
pub use meals::{
    CreateMealRequest, ListMealsFilter, MealNutrients, MealsManager, UpdateMealRequest,
};
pub use measurements::{
    CreateMeasurementRequest, ListMeasurementsFilter, MeasurementsManager,
    UpdateMeasurementRequest,
};
pub use progress_photos::{CreatePhotoRecord, ListPhotosFilter, ProgressPhotosManager};
pub use stores::{GoalStore, MeasurementStore};
pub use users::{UpdateProfileRequest, UsersManager};
pub use workouts::{
    CreateExerciseRequest, CreateWorkoutRequest, ListWorkoutsFilter, UpdateWorkoutRequest,
    WorkoutsManager,
};

use crate::constants::database::MAX_CONNECTIONS;
use crate::errors::{AppResult, DatabaseError};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Database handle owning the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and create any missing tables
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let db = Self::connect(database_url).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Connect to the database without touching the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options =
            if database_url.starts_with("sqlite:") && !database_url.contains(":memory:") {
                format!("{database_url}?mode=rwc")
            } else {
                database_url.to_owned()
            };

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(&connection_options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                context: format!("{database_url}: {e}"),
            })?;

        info!("Connected to database: {database_url}");
        Ok(Self { pool })
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_measurements().await?;
        self.migrate_goals().await?;
        self.migrate_workouts().await?;
        self.migrate_meals().await?;
        self.migrate_progress_photos().await?;

        debug!("Database migrations complete");
        Ok(())
    }

    /// Check that the database answers queries
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                context: format!("Health check query failed: {e}"),
            })?;
        Ok(())
    }

    /// Run a list of schema statements for one table, reporting failures against it
    async fn execute_schema(&self, table: &'static str, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationFailed {
                    table,
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// User account manager
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Body measurement manager
    #[must_use]
    pub fn measurements(&self) -> MeasurementsManager {
        MeasurementsManager::new(self.pool.clone())
    }

    /// Goal manager
    #[must_use]
    pub fn goals(&self) -> GoalsManager {
        GoalsManager::new(self.pool.clone())
    }

    /// Workout manager
    #[must_use]
    pub fn workouts(&self) -> WorkoutsManager {
        WorkoutsManager::new(self.pool.clone())
    }

    /// Meal manager
    #[must_use]
    pub fn meals(&self) -> MealsManager {
        MealsManager::new(self.pool.clone())
    }

    /// Progress photo manager
    #[must_use]
    pub fn progress_photos(&self) -> ProgressPhotosManager {
        ProgressPhotosManager::new(self.pool.clone())
    }
}
