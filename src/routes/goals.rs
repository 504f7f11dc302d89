// ABOUTME: Route handlers for fitness goals and on-demand progress recomputation
// ABOUTME: Progress updates run through the goal progress engine against measurement history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Goal routes
//!
//! `current_progress` and `is_completed` are normally written by the progress
//! engine through `POST /v1/goals/:id/update-progress`. A direct `PUT` may
//! still override both.

use super::{not_found, parse_id};
use crate::database::{CreateGoalRequest, ListGoalsFilter, UpdateGoalRequest};
use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::validation::{resolve_limit, Validate};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const RESOURCE: &str = "Goal";

/// Query parameters for listing goals
#[derive(Debug, Deserialize)]
pub struct ListGoalsQuery {
    /// Exact goal type label
    pub goal_type: Option<String>,
    /// Active flag
    pub is_active: Option<bool>,
    /// Completed flag
    pub is_completed: Option<bool>,
    /// Maximum rows returned
    pub limit: Option<u32>,
}

/// Goal routes handler
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create all goal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/v1/goals", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/v1/goals/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/v1/goals/:id/update-progress",
                post(Self::handle_update_progress),
            )
            .with_state(resources)
    }

    /// Handle POST /v1/goals
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateGoalRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        request.validate()?;

        let goal = resources
            .database
            .goals()
            .create(&request.into_goal(user.id))
            .await?;

        info!(user.id = %user.id, goal.id = %goal.id, "Goal created");
        Ok((StatusCode::CREATED, Json(goal)).into_response())
    }

    /// Handle GET /v1/goals
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListGoalsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let filter = ListGoalsFilter {
            goal_type: query.goal_type,
            is_active: query.is_active,
            is_completed: query.is_completed,
            limit: resolve_limit(query.limit)?,
        };

        let goals = resources.database.goals().list(user.id, &filter).await?;
        Ok((StatusCode::OK, Json(goals)).into_response())
    }

    /// Handle GET /v1/goals/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        let goal = resources
            .database
            .goals()
            .get(id, user.id)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Handle PUT /v1/goals/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateGoalRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;
        request.validate()?;

        let goal = resources
            .database
            .goals()
            .update(id, user.id, &request, resources.clock.today())
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Handle POST /v1/goals/:id/update-progress
    async fn handle_update_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        let goal = resources
            .goal_progress_engine()
            .update_goal_progress(id, user.id)
            .await?;
        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Handle DELETE /v1/goals/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        if !resources.database.goals().delete(id, user.id).await? {
            return Err(not_found(RESOURCE));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
