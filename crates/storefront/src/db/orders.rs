//! Order creation repository.
//!
//! Checkout snapshots catalog prices and costs into the order's lines and
//! writes the order with its ledger-computed totals in one transaction;
//! there is no partially-created order visible to anyone.

use sqlx::PgPool;

use soundhaus_core::{Money, OrderId, OrderTotals, ProductId, QuoteAddress};

use super::RepositoryError;

/// Catalog snapshot used to build order lines.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogProduct {
    pub id: i32,
    pub name: String,
    pub price: Money,
    pub cost: Money,
}

/// A product line ready for insertion.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub unit_cost: Money,
    pub quantity: i32,
}

/// A custom-service line ready for insertion.
#[derive(Debug, Clone)]
pub struct NewServiceItem {
    pub notes: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub address: QuoteAddress,
    pub quoted_price: Option<Money>,
    pub cost: Money,
}

/// Repository for creating orders from checkout.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch catalog products for the given IDs.
    ///
    /// Missing IDs are simply absent from the result; the checkout flow
    /// treats that as a validation failure.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, CatalogProduct>(
            r"
            SELECT id, name, price, cost
            FROM shop.products
            WHERE id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a complete order with its lines and totals in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back and nothing is persisted.
    pub async fn create_order(
        &self,
        customer_name: &str,
        customer_email: &str,
        items: &[NewOrderItem],
        service: Option<&NewServiceItem>,
        totals: &OrderTotals,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO shop.orders
                (customer_name, customer_email, status,
                 product_subtotal, service_subtotal, tax_amount, total, total_profit)
            VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(customer_name)
        .bind(customer_email)
        .bind(totals.product_subtotal)
        .bind(totals.service_subtotal)
        .bind(totals.tax_amount)
        .bind(totals.total)
        .bind(totals.total_profit)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO shop.order_items
                    (order_id, product_id, name, unit_price, unit_cost, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_id)
            .bind(item.product_id.as_i32())
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.unit_cost)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(service) = service {
            sqlx::query(
                r"
                INSERT INTO shop.service_items
                    (order_id, notes, scheduled_date, scheduled_time,
                     street, city, state, zip, quoted_price, cost)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(order_id)
            .bind(&service.notes)
            .bind(&service.scheduled_date)
            .bind(&service.scheduled_time)
            .bind(&service.address.street)
            .bind(&service.address.city)
            .bind(&service.address.state)
            .bind(&service.address.zip)
            .bind(service.quoted_price)
            .bind(service.cost)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }
}
