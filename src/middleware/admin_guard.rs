// ABOUTME: Central admin authorization guard for routes requiring admin privileges
// ABOUTME: Verifies the authenticated user is an administrator and returns 403 if not
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Admin Authorization Guard
//!
//! Handlers authenticate first, then pass the user here instead of checking
//! `is_admin` inline.

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::User;

/// Require admin privileges for an authenticated user
///
/// # Errors
///
/// Returns a permission error (403) if the user is not an administrator
pub fn require_admin(user: &User) -> AppResult<()> {
    if user.is_admin {
        return Ok(());
    }

    AppLogger::log_security_event(
        "admin_access_denied",
        "Non-admin user requested an admin endpoint",
        Some(&user.id.to_string()),
    );
    Err(AppError::permission_denied(
        "Only administrators can access this resource",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let mut user = User::new("admin@example.com", "Admin".to_owned(), "hash".to_owned());
        let denied = require_admin(&user).unwrap_err();
        assert_eq!(denied.http_status(), 403);
        assert_eq!(denied.message, "Only administrators can access this resource");

        user.is_admin = true;
        assert!(require_admin(&user).is_ok());
    }
}
