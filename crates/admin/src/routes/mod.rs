//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (DB ping)
//!
//! # Auth
//! POST /auth/login                          - Password login, sets auth_token cookie
//! POST /auth/logout                         - Clears auth_token cookie (always succeeds)
//!
//! # Orders (admin-gated)
//! GET  /api/orders                          - Order listing, newest first
//! GET  /api/orders/:id                      - Order detail with financials
//! PUT  /api/orders/:id/status               - Status change + email notification
//! PUT  /api/orders/:id/services/:service_id - Set a service line's quoted price
//! POST /api/orders/:id/recompute            - Recompute financials from stored lines
//! GET  /api/orders/:id/emails               - Email audit log for the order
//!
//! # Catalog (admin-gated)
//! PUT  /api/products/:id                    - Update name, price, description
//! ```
//!
//! Path IDs arrive as raw strings and are validated here at the boundary;
//! handlers and repositories only ever see a positive integer ID.

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub mod auth;
pub mod email_log;
pub mod orders;
pub mod products;

/// Build the full admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(email_log::router())
}

/// Parse a path-embedded ID into a typed positive-integer ID.
///
/// An empty segment is "required" (400), anything that is not a positive
/// integer is "invalid" (400, distinct message) - both before any database
/// access, and distinct from a well-formed ID that matches no row (404).
pub(crate) fn parse_id<T: From<i32>>(raw: &str, label: &str) -> Result<T, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{label} is required")));
    }
    match trimmed.parse::<i32>() {
        Ok(n) if n > 0 => Ok(T::from(n)),
        _ => Err(AppError::BadRequest(format!("Invalid {label}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundhaus_core::OrderId;

    #[test]
    fn test_parse_id_accepts_positive_integers() {
        let id: OrderId = parse_id("42", "Order ID").expect("valid id");
        assert_eq!(id.as_i32(), 42);
    }

    #[test]
    fn test_parse_id_rejects_missing() {
        let err = parse_id::<OrderId>("", "Order ID").expect_err("rejects");
        assert_eq!(err.to_string(), "Order ID is required");
    }

    #[test]
    fn test_parse_id_rejects_malformed_distinctly() {
        for raw in ["abc", "1.5", "0", "-1", "99999999999999999999"] {
            let err = parse_id::<OrderId>(raw, "Order ID").expect_err("rejects");
            assert_eq!(err.to_string(), "Invalid Order ID", "input: {raw}");
        }
    }
}
