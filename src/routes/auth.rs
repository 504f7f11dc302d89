// ABOUTME: Authentication route handlers for registration, login, refresh, and logout
// ABOUTME: Thin HTTP layer over AuthService; tokens are returned in the response body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Authentication routes
//!
//! Tokens are stateless, so logout only acknowledges the request; clients
//! discard their tokens.

use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::services::auth::{LoginRequest, RefreshRequest, RegisterRequest};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/v1/auth/register", post(Self::handle_register))
            .route("/v1/auth/login", post(Self::handle_login))
            .route("/v1/auth/refresh", post(Self::handle_refresh))
            .route("/v1/auth/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle POST /v1/auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_service().register(request).await?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    /// Handle POST /v1/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let tokens = resources.auth_service().login(request).await?;
        Ok((StatusCode::OK, Json(tokens)).into_response())
    }

    /// Handle POST /v1/auth/refresh
    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RefreshRequest>,
    ) -> Result<Response, AppError> {
        let tokens = resources.auth_service().refresh(&request).await?;
        Ok((StatusCode::OK, Json(tokens)).into_response())
    }

    /// Handle POST /v1/auth/logout
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        info!(user.id = %user.id, "User logged out");
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Successfully logged out" })),
        )
            .into_response())
    }
}
