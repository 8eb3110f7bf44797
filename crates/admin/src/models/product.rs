//! Catalog product domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use soundhaus_core::{Money, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Current selling price.
    pub price: Money,
    /// Current cost basis used for new orders.
    pub cost: Money,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
