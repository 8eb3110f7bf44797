//! Checkout handlers.
//!
//! Turns cart lines plus the session's quote draft into a persisted order.
//! Prices and costs are snapshotted from the catalog here; the order ledger
//! computes the financial breakdown before anything is written, and the
//! order plus all its lines land in a single transaction.

use std::str::FromStr;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use soundhaus_core::{
    Money, OrderId, OrderTotals, ProductId, ProductLine, ServiceLine, ServiceQuoteDraft,
};

use crate::db::orders::{CatalogProduct, NewOrderItem, NewServiceItem};
use crate::db::{EmailLogRepository, OrderRepository};
use crate::error::AppError;
use crate::state::AppState;

use super::quote::{load_draft, save_draft};

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(submit))
}

/// One cart line in the checkout request.
#[derive(Debug, Deserialize)]
struct CheckoutItem {
    product_id: i32,
    quantity: i32,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
struct CheckoutInput {
    customer_name: Option<String>,
    customer_email: Option<String>,
    #[serde(default)]
    items: Vec<CheckoutItem>,
    /// Submit the session's quote draft as a custom-service line.
    #[serde(default)]
    include_service: bool,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
struct CheckoutResponse {
    order_id: OrderId,
    #[serde(flatten)]
    totals: OrderTotals,
}

/// Create an order from the checkout submission.
///
/// POST /api/checkout
#[instrument(skip_all)]
async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CheckoutInput>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    let customer_name = input
        .customer_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("customer_name"))?;
    let raw_email = input
        .customer_email
        .ok_or_else(|| AppError::missing_field("customer_email"))?;
    let customer_email = soundhaus_core::Email::parse(&raw_email)
        .map_err(|e| AppError::BadRequest(format!("Invalid customer_email: {e}")))?;

    if input.items.is_empty() && !input.include_service {
        return Err(AppError::BadRequest(
            "Order must contain at least one item or a service request".to_string(),
        ));
    }

    let items = resolve_items(&state, &input.items).await?;

    let service = if input.include_service {
        let draft = load_draft(&session).await?;
        Some(service_from_draft(&draft)?)
    } else {
        None
    };

    // Compute the breakdown before writing anything.
    let product_lines: Vec<ProductLine> = items
        .iter()
        .map(|item| ProductLine {
            unit_price: item.unit_price,
            unit_cost: item.unit_cost,
            quantity: item.quantity,
        })
        .collect();
    let service_lines: Vec<ServiceLine> = service
        .iter()
        .map(|s| ServiceLine {
            quoted_price: s.quoted_price,
            cost: s.cost,
        })
        .collect();
    let totals = OrderTotals::compute(&product_lines, &service_lines, state.tax())?;

    let order_id = OrderRepository::new(state.pool())
        .create_order(
            &customer_name,
            customer_email.as_str(),
            &items,
            service.as_ref(),
            &totals,
        )
        .await?;

    tracing::info!(order_id = %order_id, total = %totals.total, "order created");

    // Confirmation email is best-effort: the order exists either way, and a
    // failed dispatch is logged, never retried.
    match state
        .email()
        .send_order_confirmation(
            customer_email.as_str(),
            order_id,
            &customer_name,
            totals.total,
        )
        .await
    {
        Ok(rendered) => {
            if let Err(e) = EmailLogRepository::new(state.pool())
                .record(
                    order_id,
                    customer_email.as_str(),
                    &rendered.subject,
                    &rendered.text,
                )
                .await
            {
                tracing::error!(error = %e, order_id = %order_id, "failed to record email log entry");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, order_id = %order_id, "confirmation email failed");
        }
    }

    // The draft is consumed by submission.
    if input.include_service {
        let mut draft = load_draft(&session).await?;
        draft.reset();
        save_draft(&session, &draft).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse { order_id, totals }),
    ))
}

/// Snapshot catalog products into order lines.
async fn resolve_items(
    state: &AppState,
    items: &[CheckoutItem],
) -> Result<Vec<NewOrderItem>, AppError> {
    for item in items {
        if item.product_id <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid product ID: {}",
                item.product_id
            )));
        }
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for product {}: {}",
                item.product_id, item.quantity
            )));
        }
    }

    let ids: Vec<i32> = items.iter().map(|item| item.product_id).collect();
    let products = OrderRepository::new(state.pool()).products_by_ids(&ids).await?;

    items
        .iter()
        .map(|item| {
            let product: &CatalogProduct = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown product: {}", item.product_id))
                })?;

            Ok(NewOrderItem {
                product_id: ProductId::new(product.id),
                name: product.name.clone(),
                unit_price: product.price,
                unit_cost: product.cost,
                quantity: item.quantity,
            })
        })
        .collect()
}

/// Validate the quote draft at submission time and turn it into a line.
///
/// This is where the deferred validation happens: the draft accepts any
/// string while it is being filled in, but an order line needs a parseable
/// non-negative price (or none at all).
fn service_from_draft(draft: &ServiceQuoteDraft) -> Result<NewServiceItem, AppError> {
    if draft.is_blank() {
        return Err(AppError::BadRequest(
            "No service request in progress".to_string(),
        ));
    }

    let quoted_price = if draft.custom_price.trim().is_empty() {
        None
    } else {
        let price = Decimal::from_str(draft.custom_price.trim())
            .map(Money::new)
            .map_err(|_| {
                AppError::BadRequest(format!("Invalid service price: {}", draft.custom_price))
            })?;
        if price.is_negative() {
            return Err(AppError::BadRequest(
                "Service price must not be negative".to_string(),
            ));
        }
        Some(price)
    };

    Ok(NewServiceItem {
        notes: draft.notes.clone(),
        scheduled_date: draft.preferred_date.clone(),
        scheduled_time: draft.preferred_time.clone(),
        address: draft.address.clone(),
        quoted_price,
        cost: Money::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundhaus_core::AddressPatch;

    #[test]
    fn test_blank_draft_is_rejected() {
        let draft = ServiceQuoteDraft::new();
        assert!(matches!(
            service_from_draft(&draft),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_draft_with_price_parses() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_notes("Recap a vintage receiver");
        draft.set_custom_price("150.00");

        let line = service_from_draft(&draft).expect("valid draft");
        assert_eq!(line.quoted_price, Some(Money::from_cents(15000)));
        assert_eq!(line.notes, "Recap a vintage receiver");
    }

    #[test]
    fn test_draft_without_price_is_unpriced() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_notes("Diagnose channel dropout");

        let line = service_from_draft(&draft).expect("valid draft");
        assert_eq!(line.quoted_price, None);
    }

    #[test]
    fn test_draft_with_garbage_price_is_rejected() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_custom_price("about fifty bucks");

        assert!(matches!(
            service_from_draft(&draft),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_draft_with_negative_price_is_rejected() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_custom_price("-5.00");

        assert!(matches!(
            service_from_draft(&draft),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_draft_address_carries_over() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_notes("Install in-wall speakers");
        draft.set_address(AddressPatch {
            street: Some("1 Main St".to_string()),
            city: Some("Metropolis".to_string()),
            ..AddressPatch::default()
        });

        let line = service_from_draft(&draft).expect("valid draft");
        assert_eq!(line.address.street, "1 Main St");
        assert_eq!(line.address.city, "Metropolis");
    }
}
