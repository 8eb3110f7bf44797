//! Domain types for the admin panel.
//!
//! These are validated domain objects; raw database rows live in `crate::db`
//! and convert into these via `TryFrom`.

pub mod admin_user;
pub mod email_log;
pub mod order;
pub mod product;

pub use admin_user::AdminUser;
pub use email_log::EmailLogEntry;
pub use order::{Order, OrderItem, OrderSummary, ServiceItem};
pub use product::Product;
