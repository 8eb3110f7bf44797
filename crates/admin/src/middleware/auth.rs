//! Authentication middleware and extractors for admin.
//!
//! Every privileged route takes [`RequireAdminAuth`]; the extractor is the
//! session gate. It reads the `auth_token` cookie, runs it through the
//! token verifier, and rejects the request with a uniform 401 before the
//! handler body ever executes.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;
use crate::services::token::VerifiedAdmin;
use crate::state::AppState;
use soundhaus_core::AdminRole;

/// Session cookie name.
pub const AUTH_COOKIE: &str = "auth_token";

/// Extractor that requires admin authentication.
///
/// Rejects with 401 and the verifier's reason string ("No token found" /
/// "Invalid token") when the cookie is absent or does not verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdminAuth(pub VerifiedAdmin);

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(AUTH_COOKIE).map(Cookie::value);

        let admin = app
            .verifier()
            .verify(token, AdminRole::Admin)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(Self(admin))
    }
}

/// Build the session cookie carrying a freshly issued token.
///
/// HttpOnly + SameSite=Strict always; Secure when the panel is served over
/// HTTPS.
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(
            crate::services::token::TOKEN_TTL_SECONDS,
        ))
        .build()
}

/// Build an immediately-expired session cookie (logout).
///
/// Safe to send whether or not the browser held a cookie; logout is
/// idempotent.
#[must_use]
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), true);
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let cookie = expired_session_cookie(false);
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
