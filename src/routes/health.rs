// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Provides liveness, database readiness, and the root service descriptor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Health check routes for service monitoring
//!
//! These endpoints are unauthenticated so load balancers can probe them.

use crate::constants::endpoints::{DOCS, HEALTH_CHECK, READY_CHECK};
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route(HEALTH_CHECK, get(Self::handle_health))
            .route(READY_CHECK, get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_root(State(resources): State<Arc<ServerResources>>) -> Json<serde_json::Value> {
        Json(json!({
            "name": resources.config.app.name,
            "version": resources.config.app.version,
            "docs": DOCS,
            "health": HEALTH_CHECK,
        }))
    }

    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "version": resources.config.app.version,
            "environment": resources.config.environment.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }

    async fn handle_ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        if let Err(e) = resources.database.ping().await {
            warn!("Readiness check failed: {e}");
            return Err(AppError::unavailable("Database is not reachable"));
        }

        Ok(Json(json!({
            "status": "ready",
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response())
    }
}
