// ABOUTME: Meal log database operations
// ABOUTME: CRUD plus date-range queries feeding the nutrition summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::rows::{
    format_date, format_time, format_timestamp, get_date, get_enum, get_optional_time,
    get_timestamp, get_uuid,
};
use super::Database;
use crate::constants::validation;
use crate::errors::{AppError, AppResult};
use crate::models::{Meal, MealType};
use crate::validation::{check_max_len, check_optional_range, Validate};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const MEAL_COLUMNS: &str = r"
    id, user_id, meal_date, meal_time, meal_type, meal_name, description, calories,
    protein_g, carbs_g, fats_g, fiber_g, water_ml, notes, created_at, updated_at
";

impl Database {
    /// Create the meals table
    pub(super) async fn migrate_meals(&self) -> AppResult<()> {
        self.execute_schema(
            "meals",
            &[
                r"
                CREATE TABLE IF NOT EXISTS meals (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    meal_date TEXT NOT NULL,
                    meal_time TEXT,
                    meal_type TEXT NOT NULL CHECK (meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
                    meal_name TEXT,
                    description TEXT,
                    calories INTEGER,
                    protein_g REAL,
                    carbs_g REAL,
                    fats_g REAL,
                    fiber_g REAL,
                    water_ml INTEGER,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_meals_user_date ON meals(user_id, meal_date)",
            ],
        )
        .await
    }
}

/// Nutrition values shared by create and update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealNutrients {
    /// Energy
    pub calories: Option<i32>,
    /// Protein in grams
    pub protein_g: Option<f64>,
    /// Carbohydrates in grams
    pub carbs_g: Option<f64>,
    /// Fats in grams
    pub fats_g: Option<f64>,
    /// Fiber in grams
    pub fiber_g: Option<f64>,
    /// Water in millilitres
    pub water_ml: Option<i32>,
}

impl Validate for MealNutrients {
    fn validate(&self) -> AppResult<()> {
        check_optional_range(
            "calories",
            self.calories.map(i64::from),
            &validation::MEAL_CALORIES,
        )?;
        check_optional_range("protein_g", self.protein_g, &validation::MACRO_GRAMS)?;
        check_optional_range("carbs_g", self.carbs_g, &validation::MACRO_GRAMS)?;
        check_optional_range("fats_g", self.fats_g, &validation::MACRO_GRAMS)?;
        check_optional_range("fiber_g", self.fiber_g, &validation::FIBER_GRAMS)?;
        check_optional_range(
            "water_ml",
            self.water_ml.map(i64::from),
            &validation::WATER_ML,
        )
    }
}

/// New meal log entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMealRequest {
    /// Day eaten
    pub meal_date: NaiveDate,
    /// Meal slot
    pub meal_type: MealType,
    /// Time of day
    pub meal_time: Option<NaiveTime>,
    /// Short name
    pub meal_name: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// Nutrition values
    #[serde(flatten)]
    pub nutrients: MealNutrients,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Validate for CreateMealRequest {
    fn validate(&self) -> AppResult<()> {
        check_max_len(
            "meal_name",
            self.meal_name.as_deref(),
            validation::MEAL_NAME_MAX_LEN,
        )?;
        self.nutrients.validate()
    }
}

/// Partial meal update; date and type are fixed once logged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMealRequest {
    /// New time of day
    pub meal_time: Option<NaiveTime>,
    /// New name
    pub meal_name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New nutrition values; absent fields are kept
    #[serde(flatten)]
    pub nutrients: MealNutrients,
    /// New notes
    pub notes: Option<String>,
}

impl Validate for UpdateMealRequest {
    fn validate(&self) -> AppResult<()> {
        check_max_len(
            "meal_name",
            self.meal_name.as_deref(),
            validation::MEAL_NAME_MAX_LEN,
        )?;
        self.nutrients.validate()
    }
}

/// Filter options for listing meals
#[derive(Debug, Clone, Copy)]
pub struct ListMealsFilter {
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Exact meal slot
    pub meal_type: Option<MealType>,
    /// Maximum number of results
    pub limit: u32,
}

/// Meal database operations manager
pub struct MealsManager {
    pool: SqlitePool,
}

impl MealsManager {
    /// Create a new meals manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Log a meal
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, user_id: Uuid, request: &CreateMealRequest) -> AppResult<Meal> {
        let now = Utc::now();
        let n = &request.nutrients;
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id,
            meal_date: request.meal_date,
            meal_time: request.meal_time,
            meal_type: request.meal_type,
            meal_name: request.meal_name.clone(),
            description: request.description.clone(),
            calories: n.calories,
            protein_g: n.protein_g,
            carbs_g: n.carbs_g,
            fats_g: n.fats_g,
            fiber_g: n.fiber_g,
            water_ml: n.water_ml,
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO meals (
                id, user_id, meal_date, meal_time, meal_type, meal_name, description, calories,
                protein_g, carbs_g, fats_g, fiber_g, water_ml, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ",
        )
        .bind(meal.id.to_string())
        .bind(user_id.to_string())
        .bind(format_date(meal.meal_date))
        .bind(meal.meal_time.map(format_time))
        .bind(meal.meal_type.as_str())
        .bind(&meal.meal_name)
        .bind(&meal.description)
        .bind(meal.calories)
        .bind(meal.protein_g)
        .bind(meal.carbs_g)
        .bind(meal.fats_g)
        .bind(meal.fiber_g)
        .bind(meal.water_ml)
        .bind(&meal.notes)
        .bind(format_timestamp(&meal.created_at))
        .bind(format_timestamp(&meal.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create meal: {e}")))?;

        Ok(meal)
    }

    /// Get a meal owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Meal>> {
        let row = sqlx::query(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get meal: {e}")))?;

        row.map(|r| row_to_meal(&r)).transpose()
    }

    /// List a user's meals, latest day and time first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, user_id: Uuid, filter: &ListMealsFilter) -> AppResult<Vec<Meal>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {MEAL_COLUMNS} FROM meals
            WHERE user_id = $1
              AND ($2 IS NULL OR meal_date >= $2)
              AND ($3 IS NULL OR meal_date <= $3)
              AND ($4 IS NULL OR meal_type = $4)
            ORDER BY meal_date DESC, meal_time DESC, created_at DESC
            LIMIT $5
            "
        ))
        .bind(user_id.to_string())
        .bind(filter.start_date.map(format_date))
        .bind(filter.end_date.map(format_date))
        .bind(filter.meal_type.map(|t| t.as_str()))
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list meals: {e}")))?;

        rows.iter().map(row_to_meal).collect()
    }

    /// Every meal logged on one day
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_date(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<Meal>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE user_id = $1 AND meal_date = $2 ORDER BY meal_time ASC"
        ))
        .bind(user_id.to_string())
        .bind(format_date(date))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list meals for date: {e}")))?;

        rows.iter().map(row_to_meal).collect()
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateMealRequest,
    ) -> AppResult<Option<Meal>> {
        let Some(existing) = self.get(id, user_id).await? else {
            return Ok(None);
        };
        let n = &request.nutrients;

        let result = sqlx::query(
            r"
            UPDATE meals SET
                meal_time = $1, meal_name = $2, description = $3, calories = $4, protein_g = $5,
                carbs_g = $6, fats_g = $7, fiber_g = $8, water_ml = $9, notes = $10, updated_at = $11
            WHERE id = $12 AND user_id = $13
            ",
        )
        .bind(request.meal_time.or(existing.meal_time).map(format_time))
        .bind(request.meal_name.as_deref().or(existing.meal_name.as_deref()))
        .bind(request.description.as_deref().or(existing.description.as_deref()))
        .bind(n.calories.or(existing.calories))
        .bind(n.protein_g.or(existing.protein_g))
        .bind(n.carbs_g.or(existing.carbs_g))
        .bind(n.fats_g.or(existing.fats_g))
        .bind(n.fiber_g.or(existing.fiber_g))
        .bind(n.water_ml.or(existing.water_ml))
        .bind(request.notes.as_deref().or(existing.notes.as_deref()))
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update meal: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id, user_id).await
    }

    /// Delete a meal owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete meal: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_meal(row: &SqliteRow) -> AppResult<Meal> {
    Ok(Meal {
        id: get_uuid(row, "id")?,
        user_id: get_uuid(row, "user_id")?,
        meal_date: get_date(row, "meal_date")?,
        meal_time: get_optional_time(row, "meal_time")?,
        meal_type: get_enum(row, "meal_type", MealType::parse)?,
        meal_name: row.get("meal_name"),
        description: row.get("description"),
        calories: row.get("calories"),
        protein_g: row.get("protein_g"),
        carbs_g: row.get("carbs_g"),
        fats_g: row.get("fats_g"),
        fiber_g: row.get("fiber_g"),
        water_ml: row.get("water_ml"),
        notes: row.get("notes"),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    async fn setup() -> (MealsManager, Uuid) {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let user = User::new("meal@example.com", "Meal".to_owned(), "hash".to_owned());
        db.users().create(&user).await.unwrap();
        (db.meals(), user.id)
    }

    fn meal(day: u32, meal_type: MealType, hour: u32, calories: i32) -> CreateMealRequest {
        CreateMealRequest {
            meal_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            meal_type,
            meal_time: NaiveTime::from_hms_opt(hour, 0, 0),
            meal_name: None,
            description: None,
            nutrients: MealNutrients {
                calories: Some(calories),
                protein_g: Some(30.0),
                ..MealNutrients::default()
            },
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_time() {
        let (meals, user_id) = setup().await;
        meals.create(user_id, &meal(1, MealType::Breakfast, 8, 400)).await.unwrap();
        meals.create(user_id, &meal(1, MealType::Dinner, 19, 800)).await.unwrap();
        meals.create(user_id, &meal(2, MealType::Lunch, 12, 600)).await.unwrap();

        let listed = meals
            .list(
                user_id,
                &ListMealsFilter {
                    start_date: None,
                    end_date: None,
                    meal_type: None,
                    limit: 100,
                },
            )
            .await
            .unwrap();
        let types: Vec<_> = listed.iter().map(|m| m.meal_type).collect();
        assert_eq!(
            types,
            [MealType::Lunch, MealType::Dinner, MealType::Breakfast]
        );

        let dinners = meals
            .list(
                user_id,
                &ListMealsFilter {
                    start_date: None,
                    end_date: None,
                    meal_type: Some(MealType::Dinner),
                    limit: 100,
                },
            )
            .await
            .unwrap();
        assert_eq!(dinners.len(), 1);
        assert_eq!(dinners[0].meal_time, NaiveTime::from_hms_opt(19, 0, 0));
    }

    #[tokio::test]
    async fn test_update_keeps_unset_nutrients() {
        let (meals, user_id) = setup().await;
        let created = meals.create(user_id, &meal(1, MealType::Lunch, 12, 600)).await.unwrap();

        let updated = meals
            .update(
                created.id,
                user_id,
                &UpdateMealRequest {
                    nutrients: MealNutrients {
                        calories: Some(650),
                        ..MealNutrients::default()
                    },
                    ..UpdateMealRequest::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.calories, Some(650));
        assert_eq!(updated.protein_g, Some(30.0));

        assert!(meals.delete(created.id, user_id).await.unwrap());
        assert!(meals.get(created.id, user_id).await.unwrap().is_none());
    }

    #[test]
    fn test_fiber_bound() {
        let mut request = meal(1, MealType::Snack, 15, 100);
        request.nutrients.fiber_g = Some(200.5);
        let error = request.validate().unwrap_err();
        assert_eq!(error.message, "fiber_g must be between 0 and 200");
    }
}
