// ABOUTME: Route handlers for workout sessions with their exercises and volume statistics
// ABOUTME: Exercises are created with their workout and come back ordered by order_index

use super::{not_found, parse_id};
use crate::database::{CreateWorkoutRequest, ListWorkoutsFilter, UpdateWorkoutRequest};
use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::services::workout_stats::workout_stats;
use crate::validation::{resolve_limit, Validate};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const RESOURCE: &str = "Workout";

/// Query parameters for listing workouts
#[derive(Debug, Deserialize)]
pub struct ListWorkoutsQuery {
    /// Earliest date included
    pub start_date: Option<NaiveDate>,
    /// Latest date included
    pub end_date: Option<NaiveDate>,
    /// Exact workout type label
    pub workout_type: Option<String>,
    /// Maximum rows returned
    pub limit: Option<u32>,
}

/// Date window for workout statistics
#[derive(Debug, Deserialize)]
pub struct WorkoutStatsQuery {
    /// Earliest date included
    pub start_date: Option<NaiveDate>,
    /// Latest date included
    pub end_date: Option<NaiveDate>,
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/v1/workouts",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/v1/workouts/stats", get(Self::handle_stats))
            .route(
                "/v1/workouts/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /v1/workouts
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        request.validate()?;

        let workout = resources
            .database
            .workouts()
            .create(user.id, &request)
            .await?;

        info!(
            user.id = %user.id,
            workout.id = %workout.id,
            exercises = workout.exercises.len(),
            "Workout logged"
        );
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Handle GET /v1/workouts
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let filter = ListWorkoutsFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            workout_type: query.workout_type,
            limit: resolve_limit(query.limit)?,
        };

        let workouts = resources
            .database
            .workouts()
            .list(user.id, &filter)
            .await?;
        Ok((StatusCode::OK, Json(workouts)).into_response())
    }

    /// Handle GET /v1/workouts/stats
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WorkoutStatsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let stats = workout_stats(
            &resources.database,
            user.id,
            query.start_date,
            query.end_date,
        )
        .await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    /// Handle GET /v1/workouts/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        let workout = resources
            .database
            .workouts()
            .get(id, user.id)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle PUT /v1/workouts/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;
        request.validate()?;

        let workout = resources
            .database
            .workouts()
            .update(id, user.id, &request)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle DELETE /v1/workouts/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        if !resources.database.workouts().delete(id, user.id).await? {
            return Err(not_found(RESOURCE));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
