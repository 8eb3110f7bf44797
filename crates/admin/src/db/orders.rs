//! Order repository for database operations.
//!
//! Reads orders with their lines and applies status transitions. Financial
//! columns are only ever written by the order ledger service, which owns
//! the recompute transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use soundhaus_core::{
    Email, Money, OrderId, OrderItemId, OrderStatus, OrderTotals, ProductId, QuoteAddress,
    ServiceItemId,
};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderSummary, ServiceItem};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    id: i32,
    customer_name: String,
    customer_email: String,
    status: OrderStatus,
    product_subtotal: Money,
    service_subtotal: Money,
    tax_amount: Money,
    total: Money,
    total_profit: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Internal row type for order line queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderItemRow {
    id: i32,
    product_id: i32,
    name: String,
    unit_price: Money,
    unit_cost: Money,
    quantity: i32,
}

/// Internal row type for custom-service line queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ServiceItemRow {
    id: i32,
    notes: String,
    scheduled_date: String,
    scheduled_time: String,
    street: String,
    city: String,
    state: String,
    zip: String,
    quoted_price: Option<Money>,
    cost: Money,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            unit_price: row.unit_price,
            unit_cost: row.unit_cost,
            quantity: row.quantity,
        }
    }
}

impl From<ServiceItemRow> for ServiceItem {
    fn from(row: ServiceItemRow) -> Self {
        Self {
            id: ServiceItemId::new(row.id),
            notes: row.notes,
            scheduled_date: row.scheduled_date,
            scheduled_time: row.scheduled_time,
            address: QuoteAddress {
                street: row.street,
                city: row.city,
                state: row.state,
                zip: row.zip,
            },
            quoted_price: row.quoted_price,
            cost: row.cost,
        }
    }
}

impl OrderRow {
    fn into_order(
        self,
        items: Vec<OrderItem>,
        services: Vec<ServiceItem>,
    ) -> Result<Order, RepositoryError> {
        let email = Email::parse(&self.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            customer_name: self.customer_name,
            customer_email: email,
            status: self.status,
            totals: OrderTotals {
                product_subtotal: self.product_subtotal,
                service_subtotal: self.service_subtotal,
                tax_amount: self.tax_amount,
                total: self.total,
                total_profit: self.total_profit,
            },
            items,
            services,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// =============================================================================
// Line Fetch Helpers
// =============================================================================
//
// Generic over the executor so the ledger service can reuse them inside its
// recompute transaction.

pub(crate) async fn fetch_items<'e, E>(
    executor: E,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT id, product_id, name, unit_price, unit_cost, quantity
        FROM shop.order_items
        WHERE order_id = $1
        ORDER BY id
        ",
    )
    .bind(order_id.as_i32())
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub(crate) async fn fetch_services<'e, E>(
    executor: E,
    order_id: OrderId,
) -> Result<Vec<ServiceItem>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, ServiceItemRow>(
        r"
        SELECT id, notes, scheduled_date, scheduled_time,
               street, city, state, zip, quoted_price, cost
        FROM shop.service_items
        WHERE order_id = $1
        ORDER BY id
        ",
    )
    .bind(order_id.as_i32())
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<OrderSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            id: i32,
            customer_name: String,
            status: OrderStatus,
            total: Money,
            created_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT id, customer_name, status, total, created_at
            FROM shop.orders
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderSummary {
                id: OrderId::new(row.id),
                customer_name: row.customer_name,
                status: row.status,
                total: row.total,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Get a full order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_name, customer_email, status,
                   product_subtotal, service_subtotal, tax_amount, total, total_profit,
                   created_at, updated_at
            FROM shop.orders
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = fetch_items(self.pool, id).await?;
        let services = fetch_services(self.pool, id).await?;

        row.into_order(items, services).map(Some)
    }

    /// Get just an order's status.
    ///
    /// Used to classify a failed conditional update as "not found" versus
    /// "frozen in a terminal status".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_status(&self, id: OrderId) -> Result<Option<OrderStatus>, RepositoryError> {
        let status = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT status FROM shop.orders WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(status)
    }

    /// Transition an order's status.
    ///
    /// Existence check and write are one conditional statement: the update
    /// only lands on a row that exists and is not already terminal, and the
    /// RETURNING clause reports whether it did. Returns `true` when the row
    /// was updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let updated = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE shop.orders
            SET status = $2, updated_at = now()
            WHERE id = $1
              AND status NOT IN ('completed', 'cancelled')
            RETURNING id
            ",
        )
        .bind(id.as_i32())
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        Ok(updated.is_some())
    }
}
