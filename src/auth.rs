// ABOUTME: JWT-based user authentication with HS256 access and refresh tokens
// ABOUTME: Handles token generation, validation, expiry reporting, and secret generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! # Authentication Tokens
//!
//! Access tokens are short-lived and authorize API calls. Refresh tokens live
//! longer and may only be exchanged for a new pair. Both are HS256 `JWT`s that
//! carry a `token_type` claim so one cannot stand in for the other.

use crate::config::AuthConfig;
use crate::constants::auth::{GENERATED_SECRET_LENGTH, TOKEN_TYPE_BEARER};
use crate::errors::AppError;
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};
use uuid::Uuid;

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// Purpose of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Authorizes API requests
    Access,
    /// Exchanges for a new token pair
    Refresh,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
    /// A valid token presented for the wrong purpose
    WrongTokenType {
        /// Type the caller required
        expected: TokenType,
        /// Type carried by the token
        actual: TokenType,
    },
}

impl Display for JwtValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => write!(
                f,
                "JWT token expired {} ago at {}",
                humanize_duration(current_time.signed_duration_since(*expired_at)),
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
            Self::WrongTokenType { expected, actual } => {
                write!(f, "Expected {expected} token, got {actual} token")
            }
        }
    }
}

impl StdError for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            other => Self::auth_invalid("Could not validate credentials").with_source(other),
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Token purpose
    pub token_type: TokenType,
}

impl Claims {
    /// Parse the subject as a user id
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, JwtValidationError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtValidationError::TokenInvalid {
            reason: format!("Subject is not a user id: {e}"),
        })
    }
}

/// Access and refresh tokens returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived API token
    pub access_token: String,
    /// Long-lived exchange token
    pub refresh_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Issues and validates HS256 tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_lifetime: Duration,
    refresh_token_lifetime: Duration,
}

impl AuthManager {
    /// Create a manager from a shared secret and token lifetimes
    #[must_use]
    pub fn new(
        secret: &[u8],
        access_token_lifetime: Duration,
        refresh_token_lifetime: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_token_lifetime,
            refresh_token_lifetime,
        }
    }

    /// Create a manager from server configuration
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::minutes(config.access_token_expire_minutes),
            Duration::days(config.refresh_token_expire_days),
        )
    }

    /// Generate a token of the given type for a user
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT` encoding fails
    pub fn generate_token(&self, user: &User, token_type: TokenType) -> Result<String, AppError> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.access_token_lifetime,
            TokenType::Refresh => self.refresh_token_lifetime,
        };

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode {token_type} token: {e}")))
    }

    /// Generate an access and refresh token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT` encoding fails
    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.generate_token(user, TokenType::Access)?,
            refresh_token: self.generate_token(user, TokenType::Refresh)?,
            token_type: TOKEN_TYPE_BEARER.to_owned(),
        })
    }

    /// Validate a token and require the given type
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is malformed, has a bad
    /// signature, has expired, or carries a different `token_type`
    pub fn validate_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, JwtValidationError> {
        let claims = self.decode_token_claims(token)?;
        Self::check_token_expiry(&claims, Utc::now())?;

        if claims.token_type != expected {
            warn!(
                user.id = %claims.sub,
                "Rejected {} token where {} token was required",
                claims.token_type,
                expected
            );
            return Err(JwtValidationError::WrongTokenType {
                expected,
                actual: claims.token_type,
            });
        }

        debug!(user.id = %claims.sub, "JWT token validation successful");
        Ok(claims)
    }

    /// Decode claims without expiration validation so expiry can be reported precisely
    fn decode_token_claims(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Check if token is expired and return error if so
    fn check_token_expiry(
        claims: &Claims,
        current_time: DateTime<Utc>,
    ) -> Result<(), JwtValidationError> {
        if current_time.timestamp() >= claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(current_time);
            warn!(
                "JWT token expired for user: {} - Expired {} ago",
                claims.sub,
                humanize_duration(current_time.signed_duration_since(expired_at))
            );
            return Err(JwtValidationError::TokenExpired {
                expired_at,
                current_time,
            });
        }
        Ok(())
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &JwtError) -> JwtValidationError {
        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

/// Generate a random alphanumeric secret for HS256 signing
#[must_use]
pub fn generate_jwt_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AuthManager {
        AuthManager::new(b"unit-test-secret", Duration::minutes(30), Duration::days(7))
    }

    fn user() -> User {
        User::new("runner@example.com", "Runner".to_owned(), "hash".to_owned())
    }

    #[test]
    fn test_access_token_round_trip() {
        let manager = manager();
        let user = user();
        let token = manager.generate_token(&user, TokenType::Access).unwrap();

        let claims = manager.validate_token(&token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "runner@example.com");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let manager = manager();
        let pair = manager.generate_token_pair(&user()).unwrap();
        assert_eq!(pair.token_type, "bearer");

        let error = manager
            .validate_token(&pair.refresh_token, TokenType::Access)
            .unwrap_err();
        assert_eq!(
            error,
            JwtValidationError::WrongTokenType {
                expected: TokenType::Access,
                actual: TokenType::Refresh,
            }
        );
        assert!(manager
            .validate_token(&pair.refresh_token, TokenType::Refresh)
            .is_ok());
    }

    #[test]
    fn test_expired_token() {
        let manager = AuthManager::new(b"unit-test-secret", Duration::minutes(-5), Duration::days(7));
        let token = manager.generate_token(&user(), TokenType::Access).unwrap();

        let error = manager.validate_token(&token, TokenType::Access).unwrap_err();
        assert!(matches!(error, JwtValidationError::TokenExpired { .. }));
        assert!(error.to_string().contains("5 minutes"));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = AuthManager::new(b"another-secret", Duration::minutes(30), Duration::days(7));
        let token = other.generate_token(&user(), TokenType::Access).unwrap();

        let error = manager().validate_token(&token, TokenType::Access).unwrap_err();
        assert!(matches!(error, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let error = manager()
            .validate_token("not-a-jwt", TokenType::Access)
            .unwrap_err();
        assert!(matches!(error, JwtValidationError::TokenMalformed { .. }));
    }

    #[test]
    fn test_generated_secret() {
        let secret = generate_jwt_secret();
        assert_eq!(secret.len(), GENERATED_SECRET_LENGTH);
        assert_ne!(secret, generate_jwt_secret());
    }
}
