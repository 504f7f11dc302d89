// ABOUTME: Route handlers for meal logging and nutrition summaries
// ABOUTME: Daily and period summaries are aggregated by the nutrition service

use super::{not_found, parse_id};
use crate::database::{CreateMealRequest, ListMealsFilter, UpdateMealRequest};
use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::models::MealType;
use crate::resources::ServerResources;
use crate::services::nutrition::{daily_nutrition, nutrition_stats};
use crate::validation::{resolve_limit, Validate};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

const RESOURCE: &str = "Meal";

/// Query parameters for listing meals
#[derive(Debug, Deserialize)]
pub struct ListMealsQuery {
    /// Earliest date included
    pub start_date: Option<NaiveDate>,
    /// Latest date included
    pub end_date: Option<NaiveDate>,
    /// Meal slot
    pub meal_type: Option<MealType>,
    /// Maximum rows returned
    pub limit: Option<u32>,
}

/// Date window for nutrition statistics
#[derive(Debug, Deserialize)]
pub struct NutritionStatsQuery {
    /// First day included
    pub start_date: NaiveDate,
    /// Last day included
    pub end_date: NaiveDate,
}

/// Meal routes handler
pub struct MealRoutes;

impl MealRoutes {
    /// Create all meal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/v1/meals", get(Self::handle_list).post(Self::handle_create))
            .route("/v1/meals/daily/:date", get(Self::handle_daily))
            .route("/v1/meals/stats", get(Self::handle_stats))
            .route(
                "/v1/meals/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /v1/meals
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateMealRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        request.validate()?;

        let meal = resources.database.meals().create(user.id, &request).await?;
        Ok((StatusCode::CREATED, Json(meal)).into_response())
    }

    /// Handle GET /v1/meals
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListMealsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let filter = ListMealsFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            meal_type: query.meal_type,
            limit: resolve_limit(query.limit)?,
        };

        let meals = resources.database.meals().list(user.id, &filter).await?;
        Ok((StatusCode::OK, Json(meals)).into_response())
    }

    /// Handle GET /v1/meals/daily/:date
    async fn handle_daily(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(date): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| AppError::invalid_input("date must be formatted YYYY-MM-DD"))?;

        let summary = daily_nutrition(&resources.database, user.id, date).await?;
        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    /// Handle GET /v1/meals/stats
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<NutritionStatsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let stats = nutrition_stats(
            &resources.database,
            user.id,
            query.start_date,
            query.end_date,
        )
        .await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    /// Handle GET /v1/meals/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        let meal = resources
            .database
            .meals()
            .get(id, user.id)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(meal)).into_response())
    }

    /// Handle PUT /v1/meals/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateMealRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;
        request.validate()?;

        let meal = resources
            .database
            .meals()
            .update(id, user.id, &request)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(meal)).into_response())
    }

    /// Handle DELETE /v1/meals/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        if !resources.database.meals().delete(id, user.id).await? {
            return Err(not_found(RESOURCE));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
