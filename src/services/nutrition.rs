// ABOUTME: Daily and period nutrition summaries aggregated from meal logs
// ABOUTME: Totals are summed per day or period and averaged over calendar days

use crate::constants::limits::AGGREGATION_ROW_LIMIT;
use crate::database::{Database, ListMealsFilter};
use crate::errors::{AppError, AppResult};
use crate::intelligence::round_to;
use crate::models::Meal;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Everything eaten on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNutrition {
    /// Day summarized
    pub date: NaiveDate,
    /// Energy
    pub total_calories: i64,
    /// Protein in grams
    pub total_protein_g: f64,
    /// Carbohydrates in grams
    pub total_carbs_g: f64,
    /// Fats in grams
    pub total_fats_g: f64,
    /// Fiber in grams
    pub total_fiber_g: f64,
    /// Water in millilitres
    pub total_water_ml: i64,
    /// Calories per meal slot
    pub meal_breakdown: BTreeMap<String, i64>,
    /// Number of meals logged
    pub total_meals: usize,
}

/// Inclusive date window of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NutritionPeriod {
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
    /// Calendar days covered
    pub num_days: i64,
}

/// Sums over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionTotals {
    /// Meals logged
    pub total_meals: usize,
    /// Energy
    pub total_calories: i64,
    /// Protein in grams
    pub total_protein_g: f64,
    /// Carbohydrates in grams
    pub total_carbs_g: f64,
    /// Fats in grams
    pub total_fats_g: f64,
}

/// Per-day averages over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionAverages {
    /// Calories per day
    pub avg_calories_per_day: f64,
    /// Protein per day
    pub avg_protein_per_day: f64,
    /// Carbohydrates per day
    pub avg_carbs_per_day: f64,
    /// Fats per day
    pub avg_fats_per_day: f64,
    /// Meals per day
    pub avg_meals_per_day: f64,
}

/// Period nutrition statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionStats {
    /// Window summarized
    pub period: NutritionPeriod,
    /// Sums
    pub totals: NutritionTotals,
    /// Per-day averages
    pub averages: NutritionAverages,
}

#[derive(Default)]
struct Sums {
    calories: i64,
    protein_g: f64,
    carbs_g: f64,
    fats_g: f64,
    fiber_g: f64,
    water_ml: i64,
}

impl Sums {
    fn over(meals: &[Meal]) -> Self {
        meals.iter().fold(Self::default(), |mut sums, meal| {
            sums.calories += i64::from(meal.calories.unwrap_or(0));
            sums.protein_g += meal.protein_g.unwrap_or(0.0);
            sums.carbs_g += meal.carbs_g.unwrap_or(0.0);
            sums.fats_g += meal.fats_g.unwrap_or(0.0);
            sums.fiber_g += meal.fiber_g.unwrap_or(0.0);
            sums.water_ml += i64::from(meal.water_ml.unwrap_or(0));
            sums
        })
    }
}

/// Summarize one day's meals
#[must_use]
pub fn summarize_day(date: NaiveDate, meals: &[Meal]) -> DailyNutrition {
    let sums = Sums::over(meals);

    let mut meal_breakdown = BTreeMap::new();
    for meal in meals {
        *meal_breakdown
            .entry(meal.meal_type.as_str().to_owned())
            .or_insert(0) += i64::from(meal.calories.unwrap_or(0));
    }

    DailyNutrition {
        date,
        total_calories: sums.calories,
        total_protein_g: round_to(sums.protein_g, 2),
        total_carbs_g: round_to(sums.carbs_g, 2),
        total_fats_g: round_to(sums.fats_g, 2),
        total_fiber_g: round_to(sums.fiber_g, 2),
        total_water_ml: sums.water_ml,
        meal_breakdown,
        total_meals: meals.len(),
    }
}

/// Summarize a period's meals
///
/// # Errors
///
/// Returns an invalid-input error when `end_date` precedes `start_date`
pub fn summarize_period(
    start_date: NaiveDate,
    end_date: NaiveDate,
    meals: &[Meal],
) -> AppResult<NutritionStats> {
    if end_date < start_date {
        return Err(AppError::invalid_input(
            "end_date must be on or after start_date",
        ));
    }

    let num_days = (end_date - start_date).num_days() + 1;
    let sums = Sums::over(meals);
    let meal_count = meals.len();

    #[allow(clippy::cast_precision_loss)]
    let per_day = |total: f64| {
        if num_days > 0 {
            round_to(total / num_days as f64, 2)
        } else {
            0.0
        }
    };

    #[allow(clippy::cast_precision_loss)]
    let averages = NutritionAverages {
        avg_calories_per_day: per_day(sums.calories as f64),
        avg_protein_per_day: per_day(sums.protein_g),
        avg_carbs_per_day: per_day(sums.carbs_g),
        avg_fats_per_day: per_day(sums.fats_g),
        avg_meals_per_day: per_day(meal_count as f64),
    };

    Ok(NutritionStats {
        period: NutritionPeriod {
            start_date,
            end_date,
            num_days,
        },
        totals: NutritionTotals {
            total_meals: meal_count,
            total_calories: sums.calories,
            total_protein_g: round_to(sums.protein_g, 2),
            total_carbs_g: round_to(sums.carbs_g, 2),
            total_fats_g: round_to(sums.fats_g, 2),
        },
        averages,
    })
}

/// Daily nutrition for a user
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn daily_nutrition(
    database: &Database,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<DailyNutrition> {
    let meals = database.meals().list_for_date(user_id, date).await?;
    Ok(summarize_day(date, &meals))
}

/// Period nutrition statistics for a user
///
/// # Errors
///
/// Returns an invalid-input error for an inverted range, or an error if database operation fails
pub async fn nutrition_stats(
    database: &Database,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> AppResult<NutritionStats> {
    if end_date < start_date {
        return summarize_period(start_date, end_date, &[]);
    }

    let meals = database
        .meals()
        .list(
            user_id,
            &ListMealsFilter {
                start_date: Some(start_date),
                end_date: Some(end_date),
                meal_type: None,
                limit: AGGREGATION_ROW_LIMIT,
            },
        )
        .await?;

    summarize_period(start_date, end_date, &meals)
}
