//! Middleware and extractors for admin.

pub mod auth;

pub use auth::{AUTH_COOKIE, RequireAdminAuth, expired_session_cookie, session_cookie};
