// ABOUTME: Route handlers for the authenticated user's own profile
// ABOUTME: Reads and partially updates the caller's account details

use super::not_found;
use crate::database::UpdateProfileRequest;
use crate::errors::AppError;
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::validation::Validate;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Profile routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/v1/users/me",
                get(Self::handle_get_me).put(Self::handle_update_me),
            )
            .with_state(resources)
    }

    /// Handle GET /v1/users/me
    async fn handle_get_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    /// Handle PUT /v1/users/me
    async fn handle_update_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&resources, &headers).await?;
        request.validate()?;

        let updated = resources
            .database
            .users()
            .update_profile(user.id, &request)
            .await?
            .ok_or_else(|| not_found("User"))?;

        Ok((StatusCode::OK, Json(updated)).into_response())
    }
}
