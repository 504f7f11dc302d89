// ABOUTME: Meal log model with macronutrient and hydration fields
// ABOUTME: Meals are summed into daily and period nutrition summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Anything in between
    Snack,
}

impl MealType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Day eaten
    pub meal_date: NaiveDate,
    /// Time of day eaten
    pub meal_time: Option<NaiveTime>,
    /// Meal slot
    pub meal_type: MealType,
    /// Short name
    pub meal_name: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// Energy in kcal
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
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
