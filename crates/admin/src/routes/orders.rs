//! Order route handlers.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use soundhaus_core::{Money, OrderId, OrderStatus, ServiceItemId};

use crate::db::{EmailLogRepository, OrderRepository};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::order::{Order, OrderSummary};
use crate::services::ledger::OrderLedger;
use crate::state::AppState;

use super::parse_id;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list))
        .route("/api/orders/{id}", get(detail))
        .route("/api/orders/{id}/status", put(update_status))
        .route("/api/orders/{id}/services/{service_id}", put(price_service))
        .route("/api/orders/{id}/recompute", post(recompute))
}

/// List orders, newest first.
///
/// GET /api/orders
async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// Full order detail with lines and financials.
///
/// GET /api/orders/:id
async fn detail(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id: OrderId = parse_id(&id, "Order ID")?;

    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}

/// Status change request body.
#[derive(Debug, Deserialize)]
struct UpdateStatusInput {
    status: Option<String>,
}

/// Transition an order's status and notify the customer.
///
/// PUT /api/orders/:id/status
///
/// The transition is one conditional update; a terminal order is reported
/// as a conflict, not silently skipped. The notification email is sent
/// after the write and logged to the audit trail; a mail failure does not
/// roll the status back and is never retried.
#[instrument(skip_all)]
async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<Order>, AppError> {
    let id: OrderId = parse_id(&id, "Order ID")?;
    let raw_status = input.status.ok_or_else(|| AppError::missing_field("status"))?;
    let status = OrderStatus::from_str(&raw_status)
        .map_err(|_| AppError::BadRequest(format!("Invalid order status: {raw_status}")))?;

    let repo = OrderRepository::new(state.pool());
    let updated = repo.update_status(id, status).await?;

    if !updated {
        return match repo.get_status(id).await? {
            None => Err(AppError::NotFound(format!("Order {id} not found"))),
            Some(current) => Err(AppError::Conflict(format!(
                "order is {current} and can no longer be modified"
            ))),
        };
    }

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;

    tracing::info!(admin = %admin.email, order_id = %id, status = %status, "order status updated");

    match state
        .email()
        .send_order_status(
            order.customer_email.as_str(),
            id,
            &order.customer_name,
            status,
        )
        .await
    {
        Ok(rendered) => {
            if let Err(e) = EmailLogRepository::new(state.pool())
                .record(
                    id,
                    order.customer_email.as_str(),
                    &rendered.subject,
                    &rendered.text,
                )
                .await
            {
                tracing::error!(error = %e, order_id = %id, "failed to record email log entry");
            }
        }
        Err(e) => {
            // Nothing was dispatched, so nothing is logged to the audit
            // trail; the status change itself stands.
            tracing::error!(error = %e, order_id = %id, "status notification email failed");
        }
    }

    Ok(Json(order))
}

/// Service pricing request body.
#[derive(Debug, Deserialize)]
struct PriceServiceInput {
    /// Quoted price as a decimal string (e.g. "150.00").
    quoted_price: Option<String>,
}

/// Set a custom-service line's quoted price and recompute the order.
///
/// PUT /api/orders/:id/services/:service_id
#[instrument(skip_all)]
async fn price_service(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path((id, service_id)): Path<(String, String)>,
    Json(input): Json<PriceServiceInput>,
) -> Result<Json<Order>, AppError> {
    let id: OrderId = parse_id(&id, "Order ID")?;
    let service_id: ServiceItemId = parse_id(&service_id, "Service ID")?;

    let raw_price = input
        .quoted_price
        .ok_or_else(|| AppError::missing_field("quoted_price"))?;
    let price = Decimal::from_str(&raw_price)
        .map(Money::new)
        .map_err(|_| AppError::BadRequest(format!("Invalid quoted_price: {raw_price}")))?;
    if price.is_negative() {
        return Err(AppError::BadRequest(
            "quoted_price must not be negative".to_string(),
        ));
    }

    let order = OrderLedger::new(state.pool(), state.tax())
        .price_service(id, service_id, price)
        .await?;

    tracing::info!(
        admin = %admin.email,
        order_id = %id,
        service_id = %service_id,
        "service line priced, totals recomputed"
    );

    Ok(Json(order))
}

/// Recompute an order's financials from its stored lines.
///
/// POST /api/orders/:id/recompute
///
/// Idempotent: recomputing an untouched order rewrites the same values.
async fn recompute(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id: OrderId = parse_id(&id, "Order ID")?;

    OrderLedger::new(state.pool(), state.tax())
        .recompute(id)
        .await?;

    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}
