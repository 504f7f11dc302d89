// ABOUTME: HTTP middleware for authentication, admin authorization, and CORS
// ABOUTME: Route handlers call these helpers before touching user-scoped data

/// Admin-only route guard
pub mod admin_guard;
/// Bearer token authentication
pub mod auth;
/// Cross-origin resource sharing
pub mod cors;

pub use admin_guard::require_admin;
pub use auth::{authenticate, bearer_token};
pub use cors::setup_cors;
