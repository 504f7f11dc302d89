// ABOUTME: User account model with profile attributes and role flags
// ABOUTME: Password hashes are carried but never serialized
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Self-reported gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other or undisclosed
    Other,
}

impl Gender {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login email, stored lower-cased
    pub email: String,
    /// Display name
    pub full_name: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Self-reported gender
    pub gender: Option<Gender>,
    /// Height in centimetres, used for BMI
    pub height_cm: Option<i32>,
    /// Profile-level target weight
    pub target_weight_kg: Option<i32>,
    /// Inactive users cannot log in
    pub is_active: bool,
    /// Email verified
    pub is_verified: bool,
    /// Administrator flag
    pub is_admin: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Last successful login
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active, unverified, non-admin user
    #[must_use]
    pub fn new(email: &str, full_name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            full_name,
            password_hash,
            date_of_birth: None,
            gender: None,
            height_cm: None,
            target_weight_kg: None,
            is_active: true,
            is_verified: false,
            is_admin: false,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }
}

/// Canonical form used for storage and lookup
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("  Ana@Example.COM ", "Ana".to_owned(), "hash".to_owned());
        assert_eq!(user.email, "ana@example.com");
        assert!(user.is_active);
        assert!(!user.is_admin);
        assert!(!user.is_verified);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("a@b.co", "A".to_owned(), "secret-hash".to_owned());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("unknown"), None);
        assert_eq!(Gender::Other.to_string(), "other");
    }
}
