// ABOUTME: Route handlers for progress photo uploads, listing, and before/after comparison
// ABOUTME: Uploads arrive as multipart forms; bytes go to PhotoStorage and metadata to SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use super::{not_found, parse_id};
use crate::constants::validation::PHOTO_WEIGHT_KG;
use crate::database::{CreatePhotoRecord, ListPhotosFilter};
use crate::errors::{AppError, AppResult};
use crate::middleware::authenticate;
use crate::models::{PhotoType, ProgressPhoto};
use crate::resources::ServerResources;
use crate::services::photo_storage::PhotoUpload;
use crate::validation::{check_optional_range, resolve_limit};
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const RESOURCE: &str = "Progress photo";

/// Query parameters for listing photos
#[derive(Debug, Deserialize)]
pub struct ListPhotosQuery {
    /// Earliest date included
    pub start_date: Option<NaiveDate>,
    /// Latest date included
    pub end_date: Option<NaiveDate>,
    /// Camera angle
    pub photo_type: Option<PhotoType>,
    /// Maximum rows returned
    pub limit: Option<u32>,
}

/// Query parameters for a before/after comparison
#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    /// Start of the window
    pub start_date: NaiveDate,
    /// End of the window
    pub end_date: NaiveDate,
    /// Camera angle, front when omitted
    pub photo_type: Option<PhotoType>,
}

/// Window echoed back with a comparison
#[derive(Debug, Serialize)]
pub struct ComparisonPeriod {
    /// Start of the window
    pub start_date: NaiveDate,
    /// End of the window
    pub end_date: NaiveDate,
}

/// Earliest and latest photo of one angle within a window
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    /// Earliest photo on or after the start date
    pub before: Option<ProgressPhoto>,
    /// Latest photo on or before the end date
    pub after: Option<ProgressPhoto>,
    /// Camera angle compared
    pub photo_type: PhotoType,
    /// Window requested
    pub period: ComparisonPeriod,
}

/// Parsed multipart upload form
struct UploadForm {
    upload: PhotoUpload,
    photo_date: NaiveDate,
    photo_type: PhotoType,
    weight_at_photo_kg: Option<i32>,
    notes: Option<String>,
}

async fn field_text(field: Field<'_>) -> AppResult<String> {
    let name = field.name().unwrap_or_default().to_owned();
    field
        .text()
        .await
        .map(|text| text.trim().to_owned())
        .map_err(|e| AppError::invalid_input(format!("Could not read form field {name}: {e}")))
}

async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut upload = None;
    let mut photo_date = None;
    let mut photo_type = None;
    let mut weight_at_photo_kg = None;
    let mut notes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let file_name = field.file_name().map(str::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid_input(format!("Could not read upload: {e}")))?;
                upload = Some(PhotoUpload {
                    content_type,
                    file_name,
                    data,
                });
            }
            "photo_date" => {
                let text = field_text(field).await?;
                let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| {
                    AppError::invalid_input("photo_date must be formatted YYYY-MM-DD")
                })?;
                photo_date = Some(date);
            }
            "photo_type" => {
                let text = field_text(field).await?;
                let parsed = PhotoType::parse(&text).ok_or_else(|| {
                    AppError::invalid_input("photo_type must be one of front, back, side, other")
                })?;
                photo_type = Some(parsed);
            }
            "weight_at_photo_kg" => {
                let text = field_text(field).await?;
                if !text.is_empty() {
                    let weight = text.parse::<i32>().map_err(|_| {
                        AppError::invalid_input("weight_at_photo_kg must be a whole number")
                    })?;
                    weight_at_photo_kg = Some(weight);
                }
            }
            "notes" => {
                let text = field_text(field).await?;
                notes = Some(text).filter(|n| !n.is_empty());
            }
            _ => {}
        }
    }

    check_optional_range(
        "weight_at_photo_kg",
        weight_at_photo_kg.map(i64::from),
        &PHOTO_WEIGHT_KG,
    )?;

    Ok(UploadForm {
        upload: upload.ok_or_else(|| AppError::invalid_input("file is required"))?,
        photo_date: photo_date.ok_or_else(|| AppError::invalid_input("photo_date is required"))?,
        photo_type: photo_type.ok_or_else(|| AppError::invalid_input("photo_type is required"))?,
        weight_at_photo_kg,
        notes,
    })
}

/// Progress photo routes handler
pub struct ProgressPhotoRoutes;

impl ProgressPhotoRoutes {
    /// Create all progress photo routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/v1/progress-photos",
                get(Self::handle_list).post(Self::handle_upload),
            )
            .route(
                "/v1/progress-photos/comparison",
                get(Self::handle_comparison),
            )
            .route(
                "/v1/progress-photos/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /v1/progress-photos
    async fn handle_upload(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let form = read_upload_form(multipart).await?;

        let stored = resources
            .photo_storage
            .store(user.id, form.photo_type, form.upload)
            .await?;

        let photo = resources
            .database
            .progress_photos()
            .create(
                user.id,
                CreatePhotoRecord {
                    photo_date: form.photo_date,
                    photo_type: form.photo_type,
                    photo_url: stored.photo_url,
                    thumbnail_url: stored.thumbnail_url,
                    weight_at_photo_kg: form.weight_at_photo_kg,
                    notes: form.notes,
                },
            )
            .await?;

        info!(user.id = %user.id, photo.id = %photo.id, "Progress photo uploaded");
        Ok((StatusCode::CREATED, Json(photo)).into_response())
    }

    /// Handle GET /v1/progress-photos
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListPhotosQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let filter = ListPhotosFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            photo_type: query.photo_type,
            limit: resolve_limit(query.limit)?,
        };

        let photos = resources
            .database
            .progress_photos()
            .list(user.id, &filter)
            .await?;
        Ok((StatusCode::OK, Json(photos)).into_response())
    }

    /// Handle GET /v1/progress-photos/comparison
    async fn handle_comparison(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ComparisonQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let photo_type = query.photo_type.unwrap_or(PhotoType::Front);

        let (before, after) = resources
            .database
            .progress_photos()
            .comparison(user.id, query.start_date, query.end_date, photo_type)
            .await?;

        let response = ComparisonResponse {
            before,
            after,
            photo_type,
            period: ComparisonPeriod {
                start_date: query.start_date,
                end_date: query.end_date,
            },
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /v1/progress-photos/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        let photo = resources
            .database
            .progress_photos()
            .get(id, user.id)
            .await?
            .ok_or_else(|| not_found(RESOURCE))?;
        Ok((StatusCode::OK, Json(photo)).into_response())
    }

    /// Handle DELETE /v1/progress-photos/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        let id = parse_id(&id, RESOURCE)?;

        if !resources.database.progress_photos().delete(id, user.id).await? {
            return Err(not_found(RESOURCE));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
