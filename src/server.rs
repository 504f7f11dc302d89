// ABOUTME: HTTP server assembly: merges domain routers and applies the middleware stack
// ABOUTME: Binds the listener and serves until Ctrl-C triggers a graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use crate::constants::limits::MAX_PHOTO_UPLOAD_BYTES;
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{
    AdminRoutes, AuthRoutes, GoalRoutes, HealthRoutes, MealRoutes, MeasurementRoutes,
    ProgressPhotoRoutes, UserRoutes, WorkoutRoutes,
};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the complete application router
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(UserRoutes::routes(Arc::clone(resources)))
        .merge(AdminRoutes::routes(Arc::clone(resources)))
        .merge(MeasurementRoutes::routes(Arc::clone(resources)))
        .merge(GoalRoutes::routes(Arc::clone(resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(resources)))
        .merge(MealRoutes::routes(Arc::clone(resources)))
        .merge(ProgressPhotoRoutes::routes(Arc::clone(resources)))
        .layer(DefaultBodyLimit::max(MAX_PHOTO_UPLOAD_BYTES))
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured address and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!(
        "{}:{}",
        resources.config.host, resources.config.http_port
    );
    let router = build_router(&resources);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
    info!("EvoFit API listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        // Keep serving; the process can still be stopped externally
        future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
