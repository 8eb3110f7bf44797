//! Authentication route handlers for admin.
//!
//! Login issues the signed `auth_token` cookie; logout removes it. Logout
//! never fails and never cares whether a valid cookie was present - calling
//! it twice is safe.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::middleware::{expired_session_cookie, session_cookie};
use crate::services::auth::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Login request body.
#[derive(Debug, Deserialize)]
struct LoginInput {
    email: Option<String>,
    password: Option<String>,
}

/// Password login.
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let email = input.email.ok_or_else(|| AppError::missing_field("email"))?;
    let password = input
        .password
        .ok_or_else(|| AppError::missing_field("password"))?;

    let user = AdminAuthService::new(state.pool())
        .login_with_password(&email, &password)
        .await
        .map_err(|e| match e {
            AdminAuthError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            AdminAuthError::CorruptHash => AppError::Internal(e.to_string()),
            AdminAuthError::Repository(err) => AppError::Database(err),
        })?;

    let token = state
        .verifier()
        .issue(user.email.as_str(), user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(admin = %user.email, "admin logged in");

    let jar = jar.add(session_cookie(token, state.config().is_secure()));
    Ok((jar, Json(json!({ "success": true }))))
}

/// Logout: unconditionally expire the session cookie.
///
/// POST /auth/logout
async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.add(expired_session_cookie(state.config().is_secure()));
    (jar, Json(json!({ "success": true })))
}
