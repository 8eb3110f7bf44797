//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use soundhaus_core::{
    Email, Money, OrderId, OrderItemId, OrderStatus, OrderTotals, ProductId, ProductLine,
    QuoteAddress, ServiceItemId, ServiceLine,
};

/// A full order with its lines and financial breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer display name.
    pub customer_name: String,
    /// Customer contact address for notifications.
    pub customer_email: Email,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Financial breakdown maintained by the order ledger.
    #[serde(flatten)]
    pub totals: OrderTotals,
    /// Catalog product lines.
    pub items: Vec<OrderItem>,
    /// Custom-service lines.
    pub services: Vec<ServiceItem>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A catalog product line on an order.
///
/// Name, price and cost are snapshots taken at checkout time; editing the
/// catalog later never rewrites an existing order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Line ID.
    pub id: OrderItemId,
    /// Catalog product this line was created from.
    pub product_id: ProductId,
    /// Product name at time of purchase.
    pub name: String,
    /// Unit price at time of purchase.
    pub unit_price: Money,
    /// Unit cost basis at time of purchase.
    pub unit_cost: Money,
    /// Units ordered.
    pub quantity: i32,
}

impl OrderItem {
    /// View of this line as ledger input.
    #[must_use]
    pub const fn as_ledger_line(&self) -> ProductLine {
        ProductLine {
            unit_price: self.unit_price,
            unit_cost: self.unit_cost,
            quantity: self.quantity,
        }
    }
}

/// A custom-service line on an order.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceItem {
    /// Line ID.
    pub id: ServiceItemId,
    /// What the customer asked for.
    pub notes: String,
    /// Requested service date as submitted.
    pub scheduled_date: String,
    /// Requested time window as submitted.
    pub scheduled_time: String,
    /// Service address.
    pub address: QuoteAddress,
    /// Staff-quoted price; `None` until priced.
    pub quoted_price: Option<Money>,
    /// Cost basis (parts, labor).
    pub cost: Money,
}

impl ServiceItem {
    /// View of this line as ledger input.
    #[must_use]
    pub const fn as_ledger_line(&self) -> ServiceLine {
        ServiceLine {
            quoted_price: self.quoted_price,
            cost: self.cost,
        }
    }
}

/// Compact order view for list pages.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}
