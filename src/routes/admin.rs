// ABOUTME: Admin API route handlers for user oversight
// ABOUTME: Lists all accounts and any user's measurement history, admin role required
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Admin routes
//!
//! Every handler authenticates the caller and then passes the user through
//! `require_admin` before reading other users' data.

use super::{not_found, parse_id};
use crate::errors::AppError;
use crate::middleware::{authenticate, require_admin};
use crate::models::{BodyMeasurement, User};
use crate::resources::ServerResources;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// A user together with their full measurement history
#[derive(Debug, Serialize)]
pub struct UserMeasurementsResponse {
    /// Account the measurements belong to
    pub user: User,
    /// Every measurement, newest first
    pub measurements: Vec<BodyMeasurement>,
    /// Number of measurements returned
    pub total_measurements: usize,
}

/// Admin routes handler
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/v1/users/admin/all", get(Self::handle_list_users))
            .route(
                "/v1/users/admin/users/:id/measurements",
                get(Self::handle_user_measurements),
            )
            .with_state(resources)
    }

    /// Handle GET /v1/users/admin/all
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let admin = authenticate(&resources, &headers).await?;
        require_admin(&admin)?;

        let users = resources.database.users().list_all().await?;
        info!(user.id = %admin.id, count = users.len(), "Admin listed users");
        Ok((StatusCode::OK, Json(users)).into_response())
    }

    /// Handle GET /v1/users/admin/users/:id/measurements
    async fn handle_user_measurements(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let admin = authenticate(&resources, &headers).await?;
        require_admin(&admin)?;

        let user_id = parse_id(&id, "User")?;
        let user = resources
            .database
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| not_found("User"))?;

        let measurements = resources
            .database
            .measurements()
            .list_all_for_user(user_id)
            .await?;

        let response = UserMeasurementsResponse {
            user,
            total_measurements: measurements.len(),
            measurements,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
