//! Order ledger service.
//!
//! Owns every write to an order's financial columns. The pure math lives in
//! `soundhaus_core::ledger`; this service loads the order's lines, runs the
//! computation, and persists the result, so stored totals are always a pure
//! function of the stored lines and the configured tax policy.
//!
//! Pricing a service line and recomputing run in a single transaction with
//! the order row locked, so concurrent admin edits to the same order
//! serialize instead of losing updates.

use sqlx::PgPool;
use thiserror::Error;

use soundhaus_core::{
    LedgerError, Money, OrderId, OrderStatus, OrderTotals, ProductLine, ServiceItemId,
    ServiceLine, TaxPolicy,
};

use crate::db::orders::{fetch_items, fetch_services};
use crate::db::{OrderRepository, RepositoryError};
use crate::error::AppError;
use crate::models::order::{Order, OrderItem, ServiceItem};

/// Errors from ledger service operations.
#[derive(Debug, Error)]
pub enum LedgerServiceError {
    /// Target order does not exist.
    #[error("order not found")]
    OrderNotFound,

    /// Target service line does not exist on that order.
    #[error("service item not found")]
    ServiceNotFound,

    /// Order is in a terminal status and can no longer change.
    #[error("order is {0} and can no longer be modified")]
    Frozen(OrderStatus),

    /// Totals computation failed.
    #[error(transparent)]
    Math(#[from] LedgerError),

    /// Repository error from line loading.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Database error from the transaction itself.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<LedgerServiceError> for AppError {
    fn from(err: LedgerServiceError) -> Self {
        match err {
            LedgerServiceError::OrderNotFound => Self::NotFound("Order not found".to_string()),
            LedgerServiceError::ServiceNotFound => {
                Self::NotFound("Service item not found".to_string())
            }
            LedgerServiceError::Frozen(status) => {
                Self::Conflict(format!("order is {status} and can no longer be modified"))
            }
            LedgerServiceError::Math(e) => Self::Ledger(e),
            LedgerServiceError::Repository(e) => Self::Database(e),
            LedgerServiceError::Database(e) => Self::Database(RepositoryError::Database(e)),
        }
    }
}

/// Computes and persists order financials.
pub struct OrderLedger<'a> {
    pool: &'a PgPool,
    tax: TaxPolicy,
}

impl<'a> OrderLedger<'a> {
    /// Create a ledger bound to a pool and the configured tax policy.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tax: TaxPolicy) -> Self {
        Self { pool, tax }
    }

    /// Recompute an order's totals from its stored lines and persist them.
    ///
    /// Idempotent: the same lines always produce the same stored values, so
    /// a redundant recompute rewrites identical numbers.
    ///
    /// # Errors
    ///
    /// Returns `LedgerServiceError::OrderNotFound` when the order does not
    /// exist; math and database failures propagate as their own variants.
    pub async fn recompute(&self, order_id: OrderId) -> Result<OrderTotals, LedgerServiceError> {
        let mut tx = self.pool.begin().await?;

        lock_order(&mut tx, order_id).await?;
        let totals = compute_from_lines(&mut tx, order_id, self.tax).await?;
        store_totals(&mut tx, order_id, &totals).await?;

        tx.commit().await?;
        Ok(totals)
    }

    /// Set a custom-service line's quoted price and recompute the order's
    /// financials in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `Frozen` for orders in a terminal status, `ServiceNotFound`
    /// when the line is not on the order, and `OrderNotFound` when the
    /// order itself is missing.
    pub async fn price_service(
        &self,
        order_id: OrderId,
        service_id: ServiceItemId,
        price: Money,
    ) -> Result<Order, LedgerServiceError> {
        let mut tx = self.pool.begin().await?;

        let status = lock_order(&mut tx, order_id).await?;
        if status.is_terminal() {
            return Err(LedgerServiceError::Frozen(status));
        }

        let updated = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE shop.service_items
            SET quoted_price = $3
            WHERE id = $2 AND order_id = $1
            RETURNING id
            ",
        )
        .bind(order_id.as_i32())
        .bind(service_id.as_i32())
        .bind(price)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(LedgerServiceError::ServiceNotFound);
        }

        let totals = compute_from_lines(&mut tx, order_id, self.tax).await?;
        store_totals(&mut tx, order_id, &totals).await?;

        tx.commit().await?;

        OrderRepository::new(self.pool)
            .get(order_id)
            .await?
            .ok_or(LedgerServiceError::OrderNotFound)
    }
}

/// Lock the order row for the rest of the transaction; returns its status.
async fn lock_order(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: OrderId,
) -> Result<OrderStatus, LedgerServiceError> {
    sqlx::query_scalar::<_, OrderStatus>(
        "SELECT status FROM shop.orders WHERE id = $1 FOR UPDATE",
    )
    .bind(order_id.as_i32())
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(LedgerServiceError::OrderNotFound)
}

/// Load the order's lines inside the transaction and run the math.
async fn compute_from_lines(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: OrderId,
    tax: TaxPolicy,
) -> Result<OrderTotals, LedgerServiceError> {
    let items = fetch_items(&mut **tx, order_id).await?;
    let services = fetch_services(&mut **tx, order_id).await?;

    let product_lines: Vec<ProductLine> = items.iter().map(OrderItem::as_ledger_line).collect();
    let service_lines: Vec<ServiceLine> =
        services.iter().map(ServiceItem::as_ledger_line).collect();

    Ok(OrderTotals::compute(&product_lines, &service_lines, tax)?)
}

/// Persist a computed breakdown onto the order row.
async fn store_totals(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: OrderId,
    totals: &OrderTotals,
) -> Result<(), LedgerServiceError> {
    sqlx::query(
        r"
        UPDATE shop.orders
        SET product_subtotal = $2,
            service_subtotal = $3,
            tax_amount = $4,
            total = $5,
            total_profit = $6,
            updated_at = now()
        WHERE id = $1
        ",
    )
    .bind(order_id.as_i32())
    .bind(totals.product_subtotal)
    .bind(totals.service_subtotal)
    .bind(totals.tax_amount)
    .bind(totals.total)
    .bind(totals.total_profit)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
