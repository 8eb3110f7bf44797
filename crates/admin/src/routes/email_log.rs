//! Email audit log route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use soundhaus_core::{EmailLogId, OrderId};

use crate::db::EmailLogRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::email_log::EmailLogEntry;
use crate::state::AppState;

use super::parse_id;

/// Build the email log router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders/{id}/emails", get(list_for_order))
}

/// Log entry view with the derived content preview.
#[derive(Debug, Serialize)]
struct EmailLogView {
    id: EmailLogId,
    order_id: OrderId,
    recipient: String,
    subject: String,
    /// First 200 characters of the message body.
    preview: String,
    sent_at: DateTime<Utc>,
}

impl From<EmailLogEntry> for EmailLogView {
    fn from(entry: EmailLogEntry) -> Self {
        let preview = entry.preview();
        Self {
            id: entry.id,
            order_id: entry.order_id,
            recipient: entry.recipient,
            subject: entry.subject,
            preview,
            sent_at: entry.sent_at,
        }
    }
}

/// All emails sent for an order, most recent first.
///
/// GET /api/orders/:id/emails
async fn list_for_order(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EmailLogView>>, AppError> {
    let id: OrderId = parse_id(&id, "Order ID")?;

    let entries = EmailLogRepository::new(state.pool())
        .list_for_order(id)
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
