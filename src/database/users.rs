// ABOUTME: User account database operations
// ABOUTME: Handles registration storage, lookup by email, profile updates, and admin flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::rows::{
    format_date, format_timestamp, get_bool, get_optional_date, get_optional_enum,
    get_optional_timestamp, get_timestamp, get_uuid,
};
use super::Database;
use crate::constants::validation;
use crate::errors::{AppError, AppResult};
use crate::models::{normalize_email, Gender, User};
use crate::validation::{check_len, check_optional_range, Validate};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = r"
    id, email, full_name, password_hash, date_of_birth, gender, height_cm,
    target_weight_kg, is_active, is_verified, is_admin, created_at, updated_at, last_login
";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        self.execute_schema(
            "users",
            &[
                r"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL,
                    full_name TEXT NOT NULL,
                    password_hash TEXT NOT NULL,
                    date_of_birth TEXT,
                    gender TEXT CHECK (gender IN ('male', 'female', 'other')),
                    height_cm INTEGER,
                    target_weight_kg INTEGER,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    is_verified INTEGER NOT NULL DEFAULT 0,
                    is_admin INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    last_login TEXT
                )
                ",
                "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
            ],
        )
        .await
    }
}

/// Partial profile update; omitted fields keep their stored values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name
    pub full_name: Option<String>,
    /// New date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// New gender
    pub gender: Option<Gender>,
    /// New height in centimetres
    pub height_cm: Option<i32>,
    /// New target weight in whole kilograms
    pub target_weight_kg: Option<i32>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(full_name) = &self.full_name {
            check_len("full_name", full_name, &validation::FULL_NAME_LEN)?;
        }
        check_optional_range(
            "height_cm",
            self.height_cm.map(i64::from),
            &validation::HEIGHT_CM,
        )?;
        check_optional_range(
            "target_weight_kg",
            self.target_weight_kg.map(i64::from),
            &validation::PROFILE_TARGET_WEIGHT_KG,
        )
    }
}

/// User account database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken or the database operation fails
    pub async fn create(&self, user: &User) -> AppResult<User> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, email, full_name, password_hash, date_of_birth, gender, height_cm,
                target_weight_kg, is_active, is_verified, is_admin, created_at, updated_at, last_login
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.date_of_birth.map(format_date))
        .bind(user.gender.map(|g| g.as_str()))
        .bind(user.height_cm)
        .bind(user.target_weight_kg)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.is_admin)
        .bind(format_timestamp(&user.created_at))
        .bind(format_timestamp(&user.updated_at))
        .bind(user.last_login.as_ref().map(format_timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(user.clone())
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// List every user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }

    /// Apply a partial profile update
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> AppResult<Option<User>> {
        let Some(existing) = self.get(user_id).await? else {
            return Ok(None);
        };

        let full_name = request.full_name.as_ref().unwrap_or(&existing.full_name);
        let date_of_birth = request.date_of_birth.or(existing.date_of_birth);
        let gender = request.gender.or(existing.gender);
        let height_cm = request.height_cm.or(existing.height_cm);
        let target_weight_kg = request.target_weight_kg.or(existing.target_weight_kg);

        let result = sqlx::query(
            r"
            UPDATE users SET
                full_name = $1, date_of_birth = $2, gender = $3, height_cm = $4,
                target_weight_kg = $5, updated_at = $6
            WHERE id = $7
            ",
        )
        .bind(full_name)
        .bind(date_of_birth.map(format_date))
        .bind(gender.map(|g| g.as_str()))
        .bind(height_cm)
        .bind(target_weight_kg)
        .bind(format_timestamp(&Utc::now()))
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(user_id).await
    }

    /// Record a successful login
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn touch_last_login(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(format_timestamp(&Utc::now()))
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update last login: {e}")))?;
        Ok(())
    }

    /// Grant or revoke administrator rights
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn set_admin(&self, user_id: Uuid, is_admin: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET is_admin = $1, updated_at = $2 WHERE id = $3")
            .bind(is_admin)
            .bind(format_timestamp(&Utc::now()))
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update admin flag: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Activate or deactivate an account
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET is_active = $1, updated_at = $2 WHERE id = $3")
            .bind(is_active)
            .bind(format_timestamp(&Utc::now()))
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update active flag: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    Ok(User {
        id: get_uuid(row, "id")?,
        email: row.get("email"),
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        date_of_birth: get_optional_date(row, "date_of_birth")?,
        gender: get_optional_enum(row, "gender", Gender::parse)?,
        height_cm: row.get("height_cm"),
        target_weight_kg: row.get("target_weight_kg"),
        is_active: get_bool(row, "is_active"),
        is_verified: get_bool(row, "is_verified"),
        is_admin: get_bool(row, "is_admin"),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        last_login: get_optional_timestamp(row, "last_login")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn manager() -> UsersManager {
        Database::new("sqlite::memory:").await.unwrap().users()
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_email() {
        let users = manager().await;
        let user = User::new("Lifter@Example.com", "Lifter".to_owned(), "hash".to_owned());
        users.create(&user).await.unwrap();

        let found = users.get_by_email("LIFTER@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.is_active);
        assert!(!found.is_admin);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let users = manager().await;
        let first = User::new("dup@example.com", "One".to_owned(), "hash".to_owned());
        let second = User::new("dup@example.com", "Two".to_owned(), "hash".to_owned());
        users.create(&first).await.unwrap();
        assert!(users.create(&second).await.is_err());
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let users = manager().await;
        let user = User::new("p@example.com", "Before".to_owned(), "hash".to_owned());
        users.create(&user).await.unwrap();

        let updated = users
            .update_profile(
                user.id,
                &UpdateProfileRequest {
                    height_cm: Some(180),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Before");
        assert_eq!(updated.height_cm, Some(180));

        assert!(users
            .update_profile(Uuid::new_v4(), &UpdateProfileRequest::default())
            .await
            .unwrap()
            .is_none());
    }
}
