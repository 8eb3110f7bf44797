//! Order financials computation.
//!
//! Derives an order's monetary breakdown from its line items. The math lives
//! here, with no I/O: services load the lines, call [`OrderTotals::compute`],
//! and persist the result. Recomputing from the same lines always yields
//! bit-identical totals, so a redundant recompute is a no-op on stored
//! values.
//!
//! Invariants upheld:
//! - `product_subtotal + service_subtotal + tax_amount == total`
//! - `total_profit == total - sum of line cost bases`, never above `total`
//!   while costs are non-negative

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, MoneyError};

/// Errors from totals computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Monetary arithmetic overflow.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Tax rate outside `[0, 1)`.
    #[error("tax rate must be in [0, 1), got {0}")]
    InvalidTaxRate(Decimal),

    /// Line quantity must be positive.
    #[error("line quantity must be positive, got {0}")]
    InvalidQuantity(i32),
}

/// A catalog product line as it appears on an order.
///
/// Price and cost are snapshots taken at checkout; later catalog edits do
/// not touch them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductLine {
    /// Unit price charged to the customer.
    pub unit_price: Money,
    /// Unit cost basis for profit calculation.
    pub unit_cost: Money,
    /// Units ordered. Must be positive.
    pub quantity: i32,
}

/// A custom-service line on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLine {
    /// Quoted price, once staff has priced the work. Unpriced lines
    /// contribute nothing to the service subtotal.
    pub quoted_price: Option<Money>,
    /// Cost basis (parts, labor) for profit calculation.
    pub cost: Money,
}

/// Tax policy applied to the taxable subtotal.
///
/// The rate comes from configuration; the ledger never hard-codes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxPolicy {
    rate: Decimal,
}

impl TaxPolicy {
    /// Create a tax policy from a fractional rate (e.g. `0.08` for 8%).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidTaxRate` unless `0 <= rate < 1`.
    pub fn new(rate: Decimal) -> Result<Self, LedgerError> {
        if rate.is_sign_negative() || rate >= Decimal::ONE {
            return Err(LedgerError::InvalidTaxRate(rate));
        }
        Ok(Self { rate })
    }

    /// The fractional rate.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }
}

/// An order's complete financial breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of catalog line extensions (unit price x quantity).
    pub product_subtotal: Money,
    /// Sum of quoted custom-service prices.
    pub service_subtotal: Money,
    /// Tax on the taxable subtotal.
    pub tax_amount: Money,
    /// `product_subtotal + service_subtotal + tax_amount`.
    pub total: Money,
    /// `total` minus the summed cost basis of all lines.
    pub total_profit: Money,
}

impl OrderTotals {
    /// Compute totals from an order's lines under the given tax policy.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidQuantity` for a non-positive quantity
    /// and `LedgerError::Money` on arithmetic overflow. No partial result
    /// is produced on error.
    pub fn compute(
        products: &[ProductLine],
        services: &[ServiceLine],
        tax: TaxPolicy,
    ) -> Result<Self, LedgerError> {
        let mut product_subtotal = Money::ZERO;
        let mut cost_basis = Money::ZERO;

        for line in products {
            if line.quantity <= 0 {
                return Err(LedgerError::InvalidQuantity(line.quantity));
            }
            let extension = line.unit_price.checked_mul_int(line.quantity)?;
            product_subtotal = product_subtotal.checked_add(extension)?;
            let line_cost = line.unit_cost.checked_mul_int(line.quantity)?;
            cost_basis = cost_basis.checked_add(line_cost)?;
        }

        let mut service_subtotal = Money::ZERO;
        for line in services {
            if let Some(price) = line.quoted_price {
                service_subtotal = service_subtotal.checked_add(price)?;
            }
            cost_basis = cost_basis.checked_add(line.cost)?;
        }

        let taxable = product_subtotal.checked_add(service_subtotal)?;
        let tax_amount = taxable.apply_rate(tax.rate())?;
        let total = taxable.checked_add(tax_amount)?;
        let total_profit = total.checked_sub(cost_basis)?;

        Ok(Self {
            product_subtotal,
            service_subtotal,
            tax_amount,
            total,
            total_profit,
        })
    }

    /// Check the core invariant: subtotals plus tax equal the total.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.product_subtotal
            .checked_add(self.service_subtotal)
            .and_then(|s| s.checked_add(self.tax_amount))
            .is_ok_and(|sum| sum == self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).expect("valid decimal literal"))
    }

    fn eight_percent() -> TaxPolicy {
        TaxPolicy::new(Decimal::from_str("0.08").expect("valid rate")).expect("valid policy")
    }

    #[test]
    fn test_reference_breakdown() {
        // Product lines totaling 250.00, one service at 75.00, 8% tax.
        let products = [
            ProductLine {
                unit_price: money("100.00"),
                unit_cost: money("60.00"),
                quantity: 2,
            },
            ProductLine {
                unit_price: money("50.00"),
                unit_cost: money("30.00"),
                quantity: 1,
            },
        ];
        let services = [ServiceLine {
            quoted_price: Some(money("75.00")),
            cost: money("20.00"),
        }];

        let totals =
            OrderTotals::compute(&products, &services, eight_percent()).expect("computes");

        assert_eq!(totals.product_subtotal, money("250.00"));
        assert_eq!(totals.service_subtotal, money("75.00"));
        assert_eq!(totals.tax_amount, money("26.00"));
        assert_eq!(totals.total, money("351.00"));
        // 351.00 - (2*60 + 30 + 20) = 351.00 - 170.00
        assert_eq!(totals.total_profit, money("181.00"));
        assert!(totals.is_balanced());
        assert!(totals.total_profit <= totals.total);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let products = [ProductLine {
            unit_price: money("33.33"),
            unit_cost: money("11.11"),
            quantity: 3,
        }];
        let services = [ServiceLine {
            quoted_price: Some(money("19.99")),
            cost: money("5.00"),
        }];

        let first =
            OrderTotals::compute(&products, &services, eight_percent()).expect("computes");
        let second =
            OrderTotals::compute(&products, &services, eight_percent()).expect("computes");

        assert_eq!(first, second);
        // Bit-identical, not merely numerically equal: serialized forms match.
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize"),
        );
    }

    #[test]
    fn test_unpriced_service_contributes_nothing() {
        let services = [
            ServiceLine {
                quoted_price: None,
                cost: money("10.00"),
            },
            ServiceLine {
                quoted_price: Some(money("40.00")),
                cost: Money::ZERO,
            },
        ];

        let totals = OrderTotals::compute(&[], &services, eight_percent()).expect("computes");

        assert_eq!(totals.service_subtotal, money("40.00"));
        // Cost of the unpriced line still counts against profit.
        assert_eq!(totals.tax_amount, money("3.20"));
        assert_eq!(totals.total, money("43.20"));
        assert_eq!(totals.total_profit, money("33.20"));
    }

    #[test]
    fn test_empty_order_is_all_zero() {
        let totals = OrderTotals::compute(&[], &[], eight_percent()).expect("computes");
        assert_eq!(totals.total, Money::ZERO);
        assert_eq!(totals.total_profit, Money::ZERO);
        assert!(totals.is_balanced());
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let products = [ProductLine {
            unit_price: money("10.00"),
            unit_cost: money("5.00"),
            quantity: 0,
        }];
        assert_eq!(
            OrderTotals::compute(&products, &[], eight_percent()),
            Err(LedgerError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_rejects_out_of_range_tax_rate() {
        assert!(TaxPolicy::new(Decimal::from_str("-0.01").expect("decimal")).is_err());
        assert!(TaxPolicy::new(Decimal::ONE).is_err());
        assert!(TaxPolicy::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_profit_can_go_negative_but_never_exceeds_total() {
        let products = [ProductLine {
            unit_price: money("10.00"),
            unit_cost: money("50.00"),
            quantity: 1,
        }];
        let totals = OrderTotals::compute(&products, &[], eight_percent()).expect("computes");
        assert!(totals.total_profit.is_negative());
        assert!(totals.total_profit <= totals.total);
    }
}
