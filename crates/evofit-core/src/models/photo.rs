// ABOUTME: Progress photo metadata model and photo angle categories
// ABOUTME: Image bytes live in external storage; only URLs are recorded here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Camera angle of a progress photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    /// Facing the camera
    Front,
    /// Facing away
    Back,
    /// Profile
    Side,
    /// Anything else
    Other,
}

impl PhotoType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
            Self::Other => "other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            "side" => Some(Self::Side),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Display for PhotoType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for an uploaded progress photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPhoto {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Day the photo was taken
    pub photo_date: NaiveDate,
    /// Camera angle
    pub photo_type: PhotoType,
    /// Public URL of the stored image
    pub photo_url: String,
    /// Public URL of a thumbnail, when generated
    pub thumbnail_url: Option<String>,
    /// Weight recorded with the photo
    pub weight_at_photo_kg: Option<i32>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
