//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//!
//! # Quote flow (session-scoped draft)
//! GET    /api/quote         - Current draft
//! PUT    /api/quote/price   - Set the proposed price
//! PUT    /api/quote/notes   - Set the work description
//! PUT    /api/quote/date    - Set the preferred date
//! PUT    /api/quote/time    - Set the preferred time window
//! PUT    /api/quote/address - Merge address fields
//! DELETE /api/quote         - Reset the draft to blank
//!
//! # Checkout
//! POST /api/checkout        - Create an order from cart lines + draft
//! ```

use axum::Router;

use crate::state::AppState;

pub mod checkout;
pub mod quote;

/// Build the full storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(quote::router())
        .merge(checkout::router())
}
