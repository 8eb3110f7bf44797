//! Custom-service quote flow handlers.
//!
//! The draft is owned by the caller's session and nothing else; every
//! handler loads it, applies exactly one setter, and stores it back. There
//! is no validation at this layer - the checkout flow validates on
//! submission.

use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Deserialize;
use tower_sessions::Session;

use soundhaus_core::{AddressPatch, ServiceQuoteDraft};

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// Build the quote router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quote", get(current).delete(reset))
        .route("/api/quote/price", put(set_price))
        .route("/api/quote/notes", put(set_notes))
        .route("/api/quote/date", put(set_date))
        .route("/api/quote/time", put(set_time))
        .route("/api/quote/address", put(set_address))
}

/// Load the session's draft, blank if none exists yet.
pub(crate) async fn load_draft(session: &Session) -> Result<ServiceQuoteDraft, AppError> {
    Ok(session
        .get(session_keys::QUOTE_DRAFT)
        .await?
        .unwrap_or_default())
}

/// Store the draft back into the session.
pub(crate) async fn save_draft(
    session: &Session,
    draft: &ServiceQuoteDraft,
) -> Result<(), AppError> {
    session.insert(session_keys::QUOTE_DRAFT, draft).await?;
    Ok(())
}

/// Single-field setter body.
#[derive(Debug, Deserialize)]
struct ValueInput {
    value: Option<String>,
}

impl ValueInput {
    fn required(self) -> Result<String, AppError> {
        self.value.ok_or_else(|| AppError::missing_field("value"))
    }
}

/// Current draft state.
///
/// GET /api/quote
async fn current(session: Session) -> Result<Json<ServiceQuoteDraft>, AppError> {
    Ok(Json(load_draft(&session).await?))
}

/// Set the customer-proposed price.
///
/// PUT /api/quote/price
async fn set_price(
    session: Session,
    Json(input): Json<ValueInput>,
) -> Result<Json<ServiceQuoteDraft>, AppError> {
    let mut draft = load_draft(&session).await?;
    draft.set_custom_price(input.required()?);
    save_draft(&session, &draft).await?;
    Ok(Json(draft))
}

/// Set the work description.
///
/// PUT /api/quote/notes
async fn set_notes(
    session: Session,
    Json(input): Json<ValueInput>,
) -> Result<Json<ServiceQuoteDraft>, AppError> {
    let mut draft = load_draft(&session).await?;
    draft.set_notes(input.required()?);
    save_draft(&session, &draft).await?;
    Ok(Json(draft))
}

/// Set the preferred service date.
///
/// PUT /api/quote/date
async fn set_date(
    session: Session,
    Json(input): Json<ValueInput>,
) -> Result<Json<ServiceQuoteDraft>, AppError> {
    let mut draft = load_draft(&session).await?;
    draft.set_preferred_date(input.required()?);
    save_draft(&session, &draft).await?;
    Ok(Json(draft))
}

/// Set the preferred time window.
///
/// PUT /api/quote/time
async fn set_time(
    session: Session,
    Json(input): Json<ValueInput>,
) -> Result<Json<ServiceQuoteDraft>, AppError> {
    let mut draft = load_draft(&session).await?;
    draft.set_preferred_time(input.required()?);
    save_draft(&session, &draft).await?;
    Ok(Json(draft))
}

/// Merge address fields into the draft.
///
/// PUT /api/quote/address
///
/// Only the supplied sub-fields change; omitted ones keep their values.
async fn set_address(
    session: Session,
    Json(patch): Json<AddressPatch>,
) -> Result<Json<ServiceQuoteDraft>, AppError> {
    let mut draft = load_draft(&session).await?;
    draft.set_address(patch);
    save_draft(&session, &draft).await?;
    Ok(Json(draft))
}

/// Reset the draft to its initial blank state.
///
/// DELETE /api/quote
async fn reset(session: Session) -> Result<Json<ServiceQuoteDraft>, AppError> {
    let mut draft = load_draft(&session).await?;
    draft.reset();
    save_draft(&session, &draft).await?;
    Ok(Json(draft))
}
