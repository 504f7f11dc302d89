// ABOUTME: Bearer token authentication for REST route handlers
// ABOUTME: Resolves the Authorization header to an active user or a 401/403 error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

use crate::auth::TokenType;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::User;
use crate::resources::ServerResources;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::{debug, field, instrument, Span};

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// # Errors
///
/// Returns an authentication error if the header is missing, not UTF-8, or
/// uses another scheme
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Could not validate credentials"))
}

/// Authenticate a request and load the calling user
///
/// # Errors
///
/// Returns 401 for a missing, malformed, expired, or non-access token or an
/// unknown user, and 403 for a deactivated account
#[instrument(skip(resources, headers), fields(user.id = field::Empty))]
pub async fn authenticate(resources: &ServerResources, headers: &HeaderMap) -> AppResult<User> {
    let token = bearer_token(headers)?;
    let claims = resources
        .auth_manager
        .validate_token(token, TokenType::Access)?;
    let user_id = claims.user_id()?;

    let Some(user) = resources.database.users().get(user_id).await? else {
        AppLogger::log_security_event(
            "token_for_unknown_user",
            "Valid token names a user that no longer exists",
            Some(&user_id.to_string()),
        );
        return Err(AppError::auth_invalid("Could not validate credentials"));
    };

    if !user.is_active {
        return Err(AppError::permission_denied("Inactive user"));
    }

    Span::current().record("user.id", field::display(user.id));
    debug!("Request authenticated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers).unwrap_err().http_status(), 401);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers).unwrap_err().http_status(), 401);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
