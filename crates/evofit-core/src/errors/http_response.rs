// ABOUTME: Axum IntoResponse integration for AppError
// ABOUTME: Serializes errors into the JSON envelope with the mapped HTTP status

use super::{AppError, ErrorResponse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tracing::{error, warn};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_server_error() {
            error!(
                error.code = ?self.code,
                error.source = ?self.source,
                "Request failed: {}",
                self.message
            );
        } else {
            warn!(error.code = ?self.code, "Request rejected: {}", self.message);
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
