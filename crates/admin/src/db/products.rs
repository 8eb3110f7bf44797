//! Catalog product repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use soundhaus_core::{Money, ProductId};

use super::RepositoryError;
use crate::models::product::Product;

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Money,
    cost: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            cost: row.cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for catalog product operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, cost, created_at, updated_at
            FROM shop.products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Update a product's name, price and description in one statement.
    ///
    /// The existence check and the write are the same conditional update:
    /// an id with no matching row returns `None` from the RETURNING clause
    /// rather than silently succeeding, which also protects against a
    /// concurrent delete between check and write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        name: &str,
        price: Money,
        description: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE shop.products
            SET name = $2, price = $3, description = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, price, cost, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(name)
        .bind(price)
        .bind(description)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
