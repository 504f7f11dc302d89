// ABOUTME: Route handlers for body measurement logging and history
// ABOUTME: BMI is derived from the caller's stored height on create and update

use super::{not_found, parse_id};
use crate::database::{
    CreateMeasurementRequest, ListMeasurementsFilter, UpdateMeasurementRequest,
};
use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::resources::ServerResources;
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

const RESOURCE: &str = "Measurement";

/// Query parameters for listing measurements
#[derive(Debug, Deserialize)]
pub struct ListMeasurementsQuery {
    /// Earliest date included
    pub start_date: Option<NaiveDate>,
    /// Latest date included
    pub end_date: Option<NaiveDate>,
    /// Maximum rows returned
    pub limit: Option<u32>,
}

/// Measurement routes handler
pub struct MeasurementRoutes;

impl MeasurementRoutes {
    /// Create all measurement routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/v1/measurements",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/v1/measurements/latest", get(Self::handle_latest))
            .route(
                "/v1/measurements/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /v1/measurements
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateMeasurementRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        request.validate()?;

        let measurement = resources
            .database
            .measurements()
            .create(user.id, &request, user.height_cm)
            .await?;

        info!(
            user.id = %user.id,
            measurement.id = %measurement.id,
            "Measurement recorded"
        );
        Ok((StatusCode::CREATED, Json(measurement)).into_response())
    }

    /// Handle GET /v1/measurements
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListMeasurementsQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let filter = ListMeasurementsFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            limit: resolve_limit(query.limit)?,
        };

        let measurements = resources
            .database
            .measurements()
            .list(user.id, &filter)
            .await?;
        Ok((StatusCode::OK, Json(measurements)).into_response())
    }

    /// Handle GET /v1/measurements/latest
    async fn handle_latest(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let latest = resources
            .database
            .measurements()
            .latest(user.id)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(latest)).into_response())
    }

    /// Handle GET /v1/measurements/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        let measurement = resources
            .database
            .measurements()
            .get(id, user.id)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(measurement)).into_response())
    }

    /// Handle PUT /v1/measurements/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateMeasurementRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;
        request.validate()?;

        let measurement = resources
            .database
            .measurements()
            .update(id, user.id, &request, user.height_cm)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(measurement)).into_response())
    }

    /// Handle DELETE /v1/measurements/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        if !resources.database.measurements().delete(id, user.id).await? {
            return Err(not_found(RESOURCE));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
