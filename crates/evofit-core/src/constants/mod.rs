// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for validation bounds, auth lifetimes, limits, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single flat list.

/// Field validation bounds shared by request validation and tests
pub mod validation;

/// Service identity
pub mod service_names {
    /// Name used in structured logs and the tracing filter
    pub const EVOFIT_SERVER: &str = "evofit-server";
    /// Display name reported by the root endpoint
    pub const APP_NAME: &str = "EvoFit API";
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness endpoint
    pub const READY_CHECK: &str = "/ready";
    /// Versioned API base path
    pub const API_BASE: &str = "/v1";
    /// Documentation path advertised by the root endpoint
    pub const DOCS: &str = "/docs";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}

/// Token lifetimes and password rules
pub mod auth {
    /// Access token lifetime in minutes
    pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
    /// Refresh token lifetime in days
    pub const REFRESH_TOKEN_EXPIRE_DAYS: i64 = 7;
    /// Minimum password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Maximum password length
    pub const MAX_PASSWORD_LENGTH: usize = 100;
    /// Minimum JWT secret length accepted in production
    pub const MIN_JWT_SECRET_LENGTH: usize = 32;
    /// Length of generated development secrets
    pub const GENERATED_SECRET_LENGTH: usize = 64;
    /// Token type reported to clients
    pub const TOKEN_TYPE_BEARER: &str = "bearer";
}

/// List query limits
pub mod limits {
    /// Default number of rows returned by list endpoints
    pub const DEFAULT_LIST_LIMIT: u32 = 100;
    /// Maximum number of rows a list endpoint may return
    pub const MAX_LIST_LIMIT: u32 = 500;
    /// Upper bound used when aggregating a period
    pub const AGGREGATION_ROW_LIMIT: u32 = 10_000;
    /// Maximum accepted upload size for progress photos (10 MiB)
    pub const MAX_PHOTO_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
}

/// Goal progress computation
pub mod progress {
    /// Lower clamp bound
    pub const MIN_PROGRESS: f64 = 0.0;
    /// Upper clamp bound and completion threshold
    pub const COMPLETE_PROGRESS: f64 = 100.0;
    /// Decimal places kept when persisting progress
    pub const PROGRESS_DECIMALS: i32 = 2;
}

/// Media storage
pub mod storage {
    /// Base URL used by the placeholder photo storage
    pub const DEFAULT_PHOTO_BASE_URL: &str = "https://storage.example.com/progress-photos";
    /// Accepted upload content types
    pub const ALLOWED_PHOTO_CONTENT_TYPES: [&str; 4] =
        ["image/jpeg", "image/jpg", "image/png", "image/webp"];
}

/// Database defaults
pub mod database {
    /// Default SQLite database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/evofit.db";
    /// Maximum pooled connections
    pub const MAX_CONNECTIONS: u32 = 10;
}
