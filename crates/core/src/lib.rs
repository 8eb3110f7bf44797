//! Soundhaus Core - Shared domain library.
//!
//! This crate provides common types used across all Soundhaus components:
//! - `storefront` - Public-facing shop site (quote flow, checkout)
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses
//! - [`ledger`] - Pure order-financials computation (subtotals, tax, profit)
//! - [`quote`] - In-memory custom-service quote draft state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ledger;
pub mod quote;
pub mod types;

pub use ledger::{LedgerError, OrderTotals, ProductLine, ServiceLine, TaxPolicy};
pub use quote::{AddressPatch, QuoteAddress, ServiceQuoteDraft};
pub use types::*;
