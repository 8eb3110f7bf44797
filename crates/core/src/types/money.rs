//! Fixed-point monetary amounts.
//!
//! All money in Soundhaus is a [`rust_decimal::Decimal`] held at exactly two
//! fraction digits. Construction normalizes the scale, so equal amounts are
//! bit-identical regardless of how they were computed - recomputing an
//! order's totals from the same lines always produces the same stored
//! values. Floating point is never used for money.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors from monetary arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// Arithmetic overflowed the representable range.
    #[error("monetary amount overflow")]
    Overflow,
}

/// A monetary amount with exactly two fraction digits.
///
/// Negative amounts are representable (profit can go negative); inputs that
/// must be non-negative (prices, costs) are validated at the boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a `Money` from a decimal amount.
    ///
    /// The amount is rounded half-away-from-zero to two fraction digits and
    /// rescaled, so `Money::new(dec) == Money::new(dec)` is bit-identical.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        Self(rounded)
    }

    /// Create a `Money` from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount (scale 2).
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the sum is out of range.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Subtract an amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the difference is out of range.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiply by an integer quantity (line extension).
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product is out of range.
    pub fn checked_mul_int(self, quantity: i32) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Apply a fractional rate (e.g. a tax rate of `0.08`), rounding
    /// half-away-from-zero back to two fraction digits.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the product is out of range.
    pub fn apply_rate(self, rate: Decimal) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(rate)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    #[test]
    fn test_new_normalizes_scale() {
        assert_eq!(Money::new(dec("250")).to_string(), "250.00");
        assert_eq!(Money::new(dec("250.0")).to_string(), "250.00");
        assert_eq!(Money::new(dec("250.005")).to_string(), "250.01");
        assert_eq!(Money::new(dec("-0.005")).to_string(), "-0.01");
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(7500), Money::new(dec("75.00")));
        assert_eq!(Money::from_cents(7500).to_string(), "75.00");
    }

    #[test]
    fn test_checked_add_and_sub() {
        let a = Money::from_cents(25000);
        let b = Money::from_cents(7500);
        assert_eq!(a.checked_add(b).expect("no overflow"), Money::from_cents(32500));
        assert_eq!(a.checked_sub(b).expect("no overflow"), Money::from_cents(17500));
    }

    #[test]
    fn test_line_extension() {
        let unit = Money::new(dec("19.99"));
        assert_eq!(
            unit.checked_mul_int(3).expect("no overflow"),
            Money::new(dec("59.97"))
        );
    }

    #[test]
    fn test_apply_rate_rounds_half_away_from_zero() {
        // 325.00 * 0.08 = 26.00 exactly
        let taxable = Money::from_cents(32500);
        assert_eq!(
            taxable.apply_rate(dec("0.08")).expect("no overflow"),
            Money::from_cents(2600)
        );
        // 10.25 * 0.0875 = 0.896875 -> 0.90
        let small = Money::new(dec("10.25"));
        assert_eq!(
            small.apply_rate(dec("0.0875")).expect("no overflow"),
            Money::new(dec("0.90"))
        );
    }

    #[test]
    fn test_negative_detection() {
        assert!(Money::new(dec("-1.00")).is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::new(dec("0.01")).is_negative());
    }

    #[test]
    fn test_serde_uses_string_representation() {
        let m = Money::new(dec("351.00"));
        let json = serde_json::to_string(&m).expect("serialize");
        assert_eq!(json, "\"351.00\"");
        let back: Money = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, m);
    }
}
