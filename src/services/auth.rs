// ABOUTME: Account registration, credential login, and refresh-token exchange
// ABOUTME: Password hashing and verification run on the blocking pool

use crate::auth::{AuthManager, TokenPair, TokenType};
use crate::constants::validation;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::{mask_email, AppLogger};
use crate::models::{Gender, User};
use crate::validation::{check_len, check_optional_range, check_password, is_valid_email, Validate};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Incorrect email or password";

/// New account details
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Display name
    pub full_name: String,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Gender
    pub gender: Option<Gender>,
    /// Height in centimetres
    pub height_cm: Option<i32>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> AppResult<()> {
        if !is_valid_email(&self.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        check_password(&self.password)?;
        check_len("full_name", &self.full_name, &validation::FULL_NAME_LEN)?;
        check_optional_range(
            "height_cm",
            self.height_cm.map(i64::from),
            &validation::HEIGHT_CM,
        )
    }
}

/// Email and password credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Refresh token to exchange
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// Previously issued refresh token
    pub refresh_token: String,
}

/// Authentication business logic shared by the auth routes
#[derive(Clone)]
pub struct AuthService {
    database: Database,
    auth_manager: Arc<AuthManager>,
}

impl AuthService {
    /// Create a service over the shared database and token manager
    #[must_use]
    pub const fn new(database: Database, auth_manager: Arc<AuthManager>) -> Self {
        Self {
            database,
            auth_manager,
        }
    }

    /// Create an account
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a malformed request or an email that
    /// is already registered, or an error if hashing or storage fails
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;
        info!(email = %mask_email(&request.email), "User registration attempt");

        let users = self.database.users();
        if users.get_by_email(&request.email).await?.is_some() {
            return Err(AppError::invalid_input("Email already registered"));
        }

        let password = request.password;
        let password_hash =
            task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

        let full_name = request.full_name.trim().to_owned();
        let mut user = User::new(&request.email, full_name, password_hash);
        user.date_of_birth = request.date_of_birth;
        user.gender = request.gender;
        user.height_cm = request.height_cm;

        let user = users.create(&user).await?;
        AppLogger::log_auth_event(&user.id.to_string(), "register", true, None);
        Ok(user)
    }

    /// Exchange credentials for a token pair
    ///
    /// # Errors
    ///
    /// Returns an authentication error for unknown emails or wrong passwords,
    /// and a permission error for deactivated accounts
    pub async fn login(&self, request: LoginRequest) -> AppResult<TokenPair> {
        let users = self.database.users();
        let Some(user) = users.get_by_email(&request.email).await? else {
            AppLogger::log_security_event(
                "login_unknown_email",
                &mask_email(&request.email),
                None,
            );
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        };

        let password = request.password;
        let password_hash = user.password_hash.clone();
        let is_valid = task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            AppLogger::log_auth_event(&user.id.to_string(), "login", false, Some("bad password"));
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            warn!(user.id = %user.id, "Login blocked for inactive user");
            return Err(AppError::permission_denied("Inactive user"));
        }

        users.touch_last_login(user.id).await?;
        let tokens = self.auth_manager.generate_token_pair(&user)?;
        AppLogger::log_auth_event(&user.id.to_string(), "login", true, None);
        Ok(tokens)
    }

    /// Exchange a refresh token for a fresh pair
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the token is invalid, expired, not a
    /// refresh token, or names a user that no longer exists
    pub async fn refresh(&self, request: &RefreshRequest) -> AppResult<TokenPair> {
        let claims = self
            .auth_manager
            .validate_token(&request.refresh_token, TokenType::Refresh)?;
        let user_id = claims.user_id()?;

        let user = self
            .database
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Could not validate credentials"))?;

        if !user.is_active {
            return Err(AppError::permission_denied("Inactive user"));
        }

        let tokens = self.auth_manager.generate_token_pair(&user)?;
        AppLogger::log_auth_event(&user.id.to_string(), "refresh", true, None);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::errors::ErrorCode;

    async fn service() -> AuthService {
        let config = ServerConfig::for_testing();
        let database = Database::new("sqlite::memory:").await.unwrap();
        AuthService::new(database, Arc::new(AuthManager::from_config(&config.auth)))
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_owned(),
            password: "correct-horse".to_owned(),
            full_name: "Test Lifter".to_owned(),
            date_of_birth: None,
            gender: Some(Gender::Female),
            height_cm: Some(170),
        }
    }

    #[tokio::test]
    async fn test_register_login_refresh() {
        let auth = service().await;
        let user = auth.register(registration("Lifter@Example.com")).await.unwrap();
        assert_eq!(user.email, "lifter@example.com");
        assert_ne!(user.password_hash, "correct-horse");

        let tokens = auth
            .login(LoginRequest {
                email: "lifter@example.com".to_owned(),
                password: "correct-horse".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(tokens.token_type, "bearer");

        let refreshed = auth
            .refresh(&RefreshRequest {
                refresh_token: tokens.refresh_token,
            })
            .await
            .unwrap();
        assert!(!refreshed.access_token.is_empty());

        let access_as_refresh = auth
            .refresh(&RefreshRequest {
                refresh_token: refreshed.access_token,
            })
            .await
            .unwrap_err();
        assert_eq!(access_as_refresh.http_status(), 401);
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let auth = service().await;
        auth.register(registration("dup@example.com")).await.unwrap();
        let error = auth
            .register(registration("DUP@example.com"))
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert_eq!(error.message, "Email already registered");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let auth = service().await;
        let user = auth.register(registration("who@example.com")).await.unwrap();

        let wrong = auth
            .login(LoginRequest {
                email: "who@example.com".to_owned(),
                password: "not-the-password".to_owned(),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong.http_status(), 401);
        assert_eq!(wrong.message, INVALID_CREDENTIALS);

        let unknown = auth
            .login(LoginRequest {
                email: "nobody@example.com".to_owned(),
                password: "whatever-pass".to_owned(),
            })
            .await
            .unwrap_err();
        assert_eq!(unknown.message, INVALID_CREDENTIALS);

        auth.database.users().set_active(user.id, false).await.unwrap();
        let inactive = auth
            .login(LoginRequest {
                email: "who@example.com".to_owned(),
                password: "correct-horse".to_owned(),
            })
            .await
            .unwrap_err();
        assert_eq!(inactive.http_status(), 403);
        assert_eq!(inactive.message, "Inactive user");
    }

    #[test]
    fn test_registration_validation() {
        let mut request = registration("bad-email");
        assert!(request.validate().is_err());

        request = registration("ok@example.com");
        request.password = "short".to_owned();
        assert!(request.validate().is_err());

        request = registration("ok@example.com");
        request.height_cm = Some(20);
        assert!(request.validate().is_err());
    }
}
