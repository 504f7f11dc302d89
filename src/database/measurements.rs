// ABOUTME: Body measurement database operations and snapshot lookups
// ABOUTME: CRUD with derived BMI, date-range listing, and latest/baseline snapshot queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::rows::{format_date, format_timestamp, get_date, get_timestamp, get_uuid};
use super::Database;
use crate::constants::validation;
use crate::errors::{AppError, AppResult};
use crate::models::{BodyMeasurement, Circumferences, Skinfolds};
use crate::validation::{check_optional_range, check_range, Validate};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const MEASUREMENT_COLUMNS: &str = r"
    id, user_id, measurement_date, weight_kg, body_fat_percentage, muscle_mass_kg, bmi,
    neck_cm, chest_cm, waist_cm, abdomen_cm, hips_cm,
    right_bicep_cm, left_bicep_cm, right_forearm_cm, left_forearm_cm,
    right_thigh_cm, left_thigh_cm, right_calf_cm, left_calf_cm,
    bicep_skinfold_mm, tricep_skinfold_mm, subscapular_skinfold_mm,
    suprailiac_skinfold_mm, abdominal_skinfold_mm, thigh_skinfold_mm,
    notes, created_at, updated_at
";

/// Latest-first ordering with deterministic tie-breaks on equal dates
const SNAPSHOT_ORDER: &str = "ORDER BY measurement_date DESC, created_at DESC, rowid DESC";

impl Database {
    /// Create the body measurements table
    pub(super) async fn migrate_measurements(&self) -> AppResult<()> {
        self.execute_schema(
            "body_measurements",
            &[
                r"
                CREATE TABLE IF NOT EXISTS body_measurements (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    measurement_date TEXT NOT NULL,
                    weight_kg REAL NOT NULL,
                    body_fat_percentage REAL,
                    muscle_mass_kg REAL,
                    bmi REAL,
                    neck_cm REAL,
                    chest_cm REAL,
                    waist_cm REAL,
                    abdomen_cm REAL,
                    hips_cm REAL,
                    right_bicep_cm REAL,
                    left_bicep_cm REAL,
                    right_forearm_cm REAL,
                    left_forearm_cm REAL,
                    right_thigh_cm REAL,
                    left_thigh_cm REAL,
                    right_calf_cm REAL,
                    left_calf_cm REAL,
                    bicep_skinfold_mm REAL,
                    tricep_skinfold_mm REAL,
                    subscapular_skinfold_mm REAL,
                    suprailiac_skinfold_mm REAL,
                    abdominal_skinfold_mm REAL,
                    thigh_skinfold_mm REAL,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_measurements_user_date ON body_measurements(user_id, measurement_date)",
            ],
        )
        .await
    }
}

/// New measurement snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeasurementRequest {
    /// Day the measurement was taken
    pub measurement_date: NaiveDate,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass_kg: Option<f64>,
    /// Circumferences
    #[serde(flatten)]
    pub circumferences: Circumferences,
    /// Skinfolds
    #[serde(flatten)]
    pub skinfolds: Skinfolds,
    /// Free-form notes
    pub notes: Option<String>,
}

impl CreateMeasurementRequest {
    /// Minimal request carrying only the required fields
    #[must_use]
    pub fn new(measurement_date: NaiveDate, weight_kg: f64) -> Self {
        Self {
            measurement_date,
            weight_kg,
            body_fat_percentage: None,
            muscle_mass_kg: None,
            circumferences: Circumferences::default(),
            skinfolds: Skinfolds::default(),
            notes: None,
        }
    }
}

impl Validate for CreateMeasurementRequest {
    fn validate(&self) -> AppResult<()> {
        check_range("weight_kg", self.weight_kg, &validation::WEIGHT_KG)?;
        check_optional_range(
            "body_fat_percentage",
            self.body_fat_percentage,
            &validation::BODY_FAT_PERCENTAGE,
        )?;
        check_optional_range(
            "muscle_mass_kg",
            self.muscle_mass_kg,
            &validation::MUSCLE_MASS_KG,
        )?;

        let c = &self.circumferences;
        let limb = &validation::LIMB_CIRCUMFERENCE_CM;
        let torso = &validation::TORSO_CIRCUMFERENCE_CM;
        let thigh = &validation::THIGH_CIRCUMFERENCE_CM;
        for (field, value, range) in [
            ("neck_cm", c.neck_cm, limb),
            ("chest_cm", c.chest_cm, torso),
            ("waist_cm", c.waist_cm, torso),
            ("abdomen_cm", c.abdomen_cm, torso),
            ("hips_cm", c.hips_cm, torso),
            ("right_bicep_cm", c.right_bicep_cm, limb),
            ("left_bicep_cm", c.left_bicep_cm, limb),
            ("right_forearm_cm", c.right_forearm_cm, limb),
            ("left_forearm_cm", c.left_forearm_cm, limb),
            ("right_thigh_cm", c.right_thigh_cm, thigh),
            ("left_thigh_cm", c.left_thigh_cm, thigh),
            ("right_calf_cm", c.right_calf_cm, limb),
            ("left_calf_cm", c.left_calf_cm, limb),
        ] {
            check_optional_range(field, value, range)?;
        }

        let s = &self.skinfolds;
        for (field, value) in [
            ("bicep_skinfold_mm", s.bicep_skinfold_mm),
            ("tricep_skinfold_mm", s.tricep_skinfold_mm),
            ("subscapular_skinfold_mm", s.subscapular_skinfold_mm),
            ("suprailiac_skinfold_mm", s.suprailiac_skinfold_mm),
            ("abdominal_skinfold_mm", s.abdominal_skinfold_mm),
            ("thigh_skinfold_mm", s.thigh_skinfold_mm),
        ] {
            check_optional_range(field, value, &validation::SKINFOLD_MM)?;
        }

        Ok(())
    }
}

/// Partial measurement update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMeasurementRequest {
    /// New weight in kilograms
    pub weight_kg: Option<f64>,
    /// New body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// New notes
    pub notes: Option<String>,
}

impl Validate for UpdateMeasurementRequest {
    fn validate(&self) -> AppResult<()> {
        check_optional_range("weight_kg", self.weight_kg, &validation::WEIGHT_KG)?;
        check_optional_range(
            "body_fat_percentage",
            self.body_fat_percentage,
            &validation::BODY_FAT_PERCENTAGE,
        )
    }
}

/// Filter options for listing measurements
#[derive(Debug, Clone, Copy)]
pub struct ListMeasurementsFilter {
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Maximum number of results
    pub limit: u32,
}

/// Body measurement database operations manager
pub struct MeasurementsManager {
    pool: SqlitePool,
}

impl MeasurementsManager {
    /// Create a new measurements manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a measurement, deriving BMI when the user's height is known
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMeasurementRequest,
        height_cm: Option<i32>,
    ) -> AppResult<BodyMeasurement> {
        let now = Utc::now();
        let measurement = BodyMeasurement {
            id: Uuid::new_v4(),
            user_id,
            measurement_date: request.measurement_date,
            weight_kg: request.weight_kg,
            body_fat_percentage: request.body_fat_percentage,
            muscle_mass_kg: request.muscle_mass_kg,
            bmi: height_cm.and_then(|h| BodyMeasurement::calculate_bmi(request.weight_kg, h)),
            circumferences: request.circumferences.clone(),
            skinfolds: request.skinfolds.clone(),
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.insert(&measurement).await?;
        Ok(measurement)
    }

    /// Insert a fully-formed measurement row
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn insert(&self, m: &BodyMeasurement) -> AppResult<()> {
        let c = &m.circumferences;
        let s = &m.skinfolds;

        sqlx::query(
            r"
            INSERT INTO body_measurements (
                id, user_id, measurement_date, weight_kg, body_fat_percentage, muscle_mass_kg, bmi,
                neck_cm, chest_cm, waist_cm, abdomen_cm, hips_cm,
                right_bicep_cm, left_bicep_cm, right_forearm_cm, left_forearm_cm,
                right_thigh_cm, left_thigh_cm, right_calf_cm, left_calf_cm,
                bicep_skinfold_mm, tricep_skinfold_mm, subscapular_skinfold_mm,
                suprailiac_skinfold_mm, abdominal_skinfold_mm, thigh_skinfold_mm,
                notes, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29
            )
            ",
        )
        .bind(m.id.to_string())
        .bind(m.user_id.to_string())
        .bind(format_date(m.measurement_date))
        .bind(m.weight_kg)
        .bind(m.body_fat_percentage)
        .bind(m.muscle_mass_kg)
        .bind(m.bmi)
        .bind(c.neck_cm)
        .bind(c.chest_cm)
        .bind(c.waist_cm)
        .bind(c.abdomen_cm)
        .bind(c.hips_cm)
        .bind(c.right_bicep_cm)
        .bind(c.left_bicep_cm)
        .bind(c.right_forearm_cm)
        .bind(c.left_forearm_cm)
        .bind(c.right_thigh_cm)
        .bind(c.left_thigh_cm)
        .bind(c.right_calf_cm)
        .bind(c.left_calf_cm)
        .bind(s.bicep_skinfold_mm)
        .bind(s.tricep_skinfold_mm)
        .bind(s.subscapular_skinfold_mm)
        .bind(s.suprailiac_skinfold_mm)
        .bind(s.abdominal_skinfold_mm)
        .bind(s.thigh_skinfold_mm)
        .bind(&m.notes)
        .bind(format_timestamp(&m.created_at))
        .bind(format_timestamp(&m.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create measurement: {e}")))?;

        Ok(())
    }

    /// Get a measurement owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<BodyMeasurement>> {
        let row = sqlx::query(&format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM body_measurements WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get measurement: {e}")))?;

        row.map(|r| row_to_measurement(&r)).transpose()
    }

    /// List a user's measurements, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &ListMeasurementsFilter,
    ) -> AppResult<Vec<BodyMeasurement>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {MEASUREMENT_COLUMNS} FROM body_measurements
            WHERE user_id = $1
              AND ($2 IS NULL OR measurement_date >= $2)
              AND ($3 IS NULL OR measurement_date <= $3)
            {SNAPSHOT_ORDER}
            LIMIT $4
            "
        ))
        .bind(user_id.to_string())
        .bind(filter.start_date.map(format_date))
        .bind(filter.end_date.map(format_date))
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list measurements: {e}")))?;

        rows.iter().map(row_to_measurement).collect()
    }

    /// Every measurement a user has recorded, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_all_for_user(&self, user_id: Uuid) -> AppResult<Vec<BodyMeasurement>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM body_measurements WHERE user_id = $1 {SNAPSHOT_ORDER}"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list measurements: {e}")))?;

        rows.iter().map(row_to_measurement).collect()
    }

    /// The user's most recent snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn latest(&self, user_id: Uuid) -> AppResult<Option<BodyMeasurement>> {
        let row = sqlx::query(&format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM body_measurements WHERE user_id = $1 {SNAPSHOT_ORDER} LIMIT 1"
        ))
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get latest measurement: {e}")))?;

        row.map(|r| row_to_measurement(&r)).transpose()
    }

    /// The user's most recent snapshot dated on or before `date`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn latest_at_or_before(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<BodyMeasurement>> {
        let row = sqlx::query(&format!(
            r"
            SELECT {MEASUREMENT_COLUMNS} FROM body_measurements
            WHERE user_id = $1 AND measurement_date <= $2
            {SNAPSHOT_ORDER}
            LIMIT 1
            "
        ))
        .bind(user_id.to_string())
        .bind(format_date(date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get baseline measurement: {e}")))?;

        row.map(|r| row_to_measurement(&r)).transpose()
    }

    /// Apply a partial update; BMI follows a weight change when height is known
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: &UpdateMeasurementRequest,
        height_cm: Option<i32>,
    ) -> AppResult<Option<BodyMeasurement>> {
        let Some(existing) = self.get(id, user_id).await? else {
            return Ok(None);
        };

        let weight_kg = request.weight_kg.unwrap_or(existing.weight_kg);
        let body_fat_percentage = request.body_fat_percentage.or(existing.body_fat_percentage);
        let notes = request.notes.clone().or(existing.notes);
        let bmi = match (request.weight_kg, height_cm) {
            (Some(weight), Some(height)) => BodyMeasurement::calculate_bmi(weight, height),
            _ => existing.bmi,
        };

        let result = sqlx::query(
            r"
            UPDATE body_measurements SET
                weight_kg = $1, body_fat_percentage = $2, notes = $3, bmi = $4, updated_at = $5
            WHERE id = $6 AND user_id = $7
            ",
        )
        .bind(weight_kg)
        .bind(body_fat_percentage)
        .bind(&notes)
        .bind(bmi)
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update measurement: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id, user_id).await
    }

    /// Delete a measurement owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM body_measurements WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete measurement: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_measurement(row: &SqliteRow) -> AppResult<BodyMeasurement> {
    Ok(BodyMeasurement {
        id: get_uuid(row, "id")?,
        user_id: get_uuid(row, "user_id")?,
        measurement_date: get_date(row, "measurement_date")?,
        weight_kg: row.get("weight_kg"),
        body_fat_percentage: row.get("body_fat_percentage"),
        muscle_mass_kg: row.get("muscle_mass_kg"),
        bmi: row.get("bmi"),
        circumferences: Circumferences {
            neck_cm: row.get("neck_cm"),
            chest_cm: row.get("chest_cm"),
            waist_cm: row.get("waist_cm"),
            abdomen_cm: row.get("abdomen_cm"),
            hips_cm: row.get("hips_cm"),
            right_bicep_cm: row.get("right_bicep_cm"),
            left_bicep_cm: row.get("left_bicep_cm"),
            right_forearm_cm: row.get("right_forearm_cm"),
            left_forearm_cm: row.get("left_forearm_cm"),
            right_thigh_cm: row.get("right_thigh_cm"),
            left_thigh_cm: row.get("left_thigh_cm"),
            right_calf_cm: row.get("right_calf_cm"),
            left_calf_cm: row.get("left_calf_cm"),
        },
        skinfolds: Skinfolds {
            bicep_skinfold_mm: row.get("bicep_skinfold_mm"),
            tricep_skinfold_mm: row.get("tricep_skinfold_mm"),
            subscapular_skinfold_mm: row.get("subscapular_skinfold_mm"),
            suprailiac_skinfold_mm: row.get("suprailiac_skinfold_mm"),
            abdominal_skinfold_mm: row.get("abdominal_skinfold_mm"),
            thigh_skinfold_mm: row.get("thigh_skinfold_mm"),
        },
        notes: row.get("notes"),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}
