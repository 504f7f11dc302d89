// ABOUTME: Progress photo metadata database operations
// ABOUTME: Stores URLs from the photo storage backend and answers before/after comparisons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::rows::{format_date, format_timestamp, get_date, get_enum, get_timestamp, get_uuid};
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{PhotoType, ProgressPhoto};
use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const PHOTO_COLUMNS: &str = r"
    id, user_id, photo_date, photo_type, photo_url, thumbnail_url, weight_at_photo_kg,
    notes, created_at, updated_at
";

impl Database {
    /// Create the progress photos table
    pub(super) async fn migrate_progress_photos(&self) -> AppResult<()> {
        self.execute_schema(
            "progress_photos",
            &[
                r"
                CREATE TABLE IF NOT EXISTS progress_photos (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    photo_date TEXT NOT NULL,
                    photo_type TEXT NOT NULL CHECK (photo_type IN ('front', 'back', 'side', 'other')),
                    photo_url TEXT NOT NULL,
                    thumbnail_url TEXT,
                    weight_at_photo_kg INTEGER,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_photos_user_date ON progress_photos(user_id, photo_date)",
            ],
        )
        .await
    }
}

/// Metadata for a photo that storage has already accepted
#[derive(Debug, Clone)]
pub struct CreatePhotoRecord {
    /// Day the photo was taken
    pub photo_date: NaiveDate,
    /// Camera angle
    pub photo_type: PhotoType,
    /// Where storage placed the image
    pub photo_url: String,
    /// Optional thumbnail location
    pub thumbnail_url: Option<String>,
    /// Body weight on the day
    pub weight_at_photo_kg: Option<i32>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Filter options for listing photos
#[derive(Debug, Clone, Copy)]
pub struct ListPhotosFilter {
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Exact camera angle
    pub photo_type: Option<PhotoType>,
    /// Maximum number of results
    pub limit: u32,
}

/// Progress photo database operations manager
pub struct ProgressPhotosManager {
    pool: SqlitePool,
}

impl ProgressPhotosManager {
    /// Create a new progress photos manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record photo metadata
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(
        &self,
        user_id: Uuid,
        record: CreatePhotoRecord,
    ) -> AppResult<ProgressPhoto> {
        let now = Utc::now();
        let photo = ProgressPhoto {
            id: Uuid::new_v4(),
            user_id,
            photo_date: record.photo_date,
            photo_type: record.photo_type,
            photo_url: record.photo_url,
            thumbnail_url: record.thumbnail_url,
            weight_at_photo_kg: record.weight_at_photo_kg,
            notes: record.notes,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO progress_photos (
                id, user_id, photo_date, photo_type, photo_url, thumbnail_url,
                weight_at_photo_kg, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(photo.id.to_string())
        .bind(user_id.to_string())
        .bind(format_date(photo.photo_date))
        .bind(photo.photo_type.as_str())
        .bind(&photo.photo_url)
        .bind(&photo.thumbnail_url)
        .bind(photo.weight_at_photo_kg)
        .bind(&photo.notes)
        .bind(format_timestamp(&photo.created_at))
        .bind(format_timestamp(&photo.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create progress photo: {e}")))?;

        Ok(photo)
    }

    /// Get a photo owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<ProgressPhoto>> {
        let row = sqlx::query(&format!(
            "SELECT {PHOTO_COLUMNS} FROM progress_photos WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get progress photo: {e}")))?;

        row.map(|r| row_to_photo(&r)).transpose()
    }

    /// List a user's photos, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &ListPhotosFilter,
    ) -> AppResult<Vec<ProgressPhoto>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {PHOTO_COLUMNS} FROM progress_photos
            WHERE user_id = $1
              AND ($2 IS NULL OR photo_date >= $2)
              AND ($3 IS NULL OR photo_date <= $3)
              AND ($4 IS NULL OR photo_type = $4)
            ORDER BY photo_date DESC, created_at DESC
            LIMIT $5
            "
        ))
        .bind(user_id.to_string())
        .bind(filter.start_date.map(format_date))
        .bind(filter.end_date.map(format_date))
        .bind(filter.photo_type.map(|t| t.as_str()))
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list progress photos: {e}")))?;

        rows.iter().map(row_to_photo).collect()
    }

    /// Earliest photo of `photo_type` on or after `start_date` and latest on or before `end_date`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn comparison(
        &self,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        photo_type: PhotoType,
    ) -> AppResult<(Option<ProgressPhoto>, Option<ProgressPhoto>)> {
        let before = sqlx::query(&format!(
            r"
            SELECT {PHOTO_COLUMNS} FROM progress_photos
            WHERE user_id = $1 AND photo_type = $2 AND photo_date >= $3
            ORDER BY photo_date ASC, created_at ASC
            LIMIT 1
            "
        ))
        .bind(user_id.to_string())
        .bind(photo_type.as_str())
        .bind(format_date(start_date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get comparison photo: {e}")))?;

        let after = sqlx::query(&format!(
            r"
            SELECT {PHOTO_COLUMNS} FROM progress_photos
            WHERE user_id = $1 AND photo_type = $2 AND photo_date <= $3
            ORDER BY photo_date DESC, created_at DESC
            LIMIT 1
            "
        ))
        .bind(user_id.to_string())
        .bind(photo_type.as_str())
        .bind(format_date(end_date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get comparison photo: {e}")))?;

        Ok((
            before.map(|r| row_to_photo(&r)).transpose()?,
            after.map(|r| row_to_photo(&r)).transpose()?,
        ))
    }

    /// Delete a photo owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM progress_photos WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete progress photo: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_photo(row: &SqliteRow) -> AppResult<ProgressPhoto> {
    Ok(ProgressPhoto {
        id: get_uuid(row, "id")?,
        user_id: get_uuid(row, "user_id")?,
        photo_date: get_date(row, "photo_date")?,
        photo_type: get_enum(row, "photo_type", PhotoType::parse)?,
        photo_url: row.get("photo_url"),
        thumbnail_url: row.get("thumbnail_url"),
        weight_at_photo_kg: row.get("weight_at_photo_kg"),
        notes: row.get("notes"),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}
