//! Session token issuance and verification.
//!
//! The admin session credential is a signed HS256 token carried in the
//! `auth_token` cookie. Verification is the single definition of "is an
//! admin": the signature must check out against the configured secret AND
//! the `role` claim must match the required role. Callers never branch on
//! role themselves.
//!
//! Externally a failed check is only ever "No token found" or
//! "Invalid token" - whether the signature, the claims, the expiry, or the
//! role was at fault stays in the server logs.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use soundhaus_core::AdminRole;

/// Session lifetime in seconds (24 hours, matching the panel's session policy).
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Claims carried in the admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin's email address.
    pub sub: String,
    /// Role claim; must equal the required role at verification time.
    pub role: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Token issuance failure (signing/serialization).
#[derive(Debug, Error)]
#[error("failed to sign session token: {0}")]
pub struct IssueError(#[from] jsonwebtoken::errors::Error);

/// Verification outcome surfaced to callers.
///
/// The `Display` strings are exactly what an unauthenticated caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No token was presented.
    #[error("No token found")]
    Missing,
    /// Token present but unusable: bad signature, malformed or expired
    /// claims, or wrong role. Deliberately indistinguishable externally.
    #[error("Invalid token")]
    Invalid,
}

/// The identity established by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAdmin {
    /// Email address from the `sub` claim.
    pub email: String,
    /// Verified role.
    pub role: AdminRole,
}

/// Verifies and issues admin session tokens.
///
/// Holds the process-wide signing secret, loaded once at startup; nothing
/// in a request path ever re-reads configuration.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a signed session token for an admin.
    ///
    /// # Errors
    ///
    /// Returns `IssueError` if signing fails.
    pub fn issue(&self, email: &str, role: AdminRole) -> Result<String, IssueError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            role: role.as_claim().to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECONDS,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a presented token against a required role.
    ///
    /// `token` is the raw cookie value, or `None` when the cookie is absent.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Missing` when no token is present and
    /// `VerifyError::Invalid` for every other failure. The precise cause is
    /// logged, never returned.
    pub fn verify(
        &self,
        token: Option<&str>,
        required: AdminRole,
    ) -> Result<VerifiedAdmin, VerifyError> {
        let token = token.ok_or(VerifyError::Missing)?;

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::warn!(cause = %e, "session token rejected");
            VerifyError::Invalid
        })?;

        let role: AdminRole = data.claims.role.parse().map_err(|_| {
            tracing::warn!(role = %data.claims.role, "session token carried unknown role");
            VerifyError::Invalid
        })?;

        if role != required {
            tracing::warn!(role = %role, required = %required, "session token role mismatch");
            return Err(VerifyError::Invalid);
        }

        Ok(VerifiedAdmin {
            email: data.claims.sub,
            role,
        })
    }
}
