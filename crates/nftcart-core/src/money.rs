//! # Money Module
//!
//! Provides the `Money` type for prices and cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing three NFT prices as floats:                                    │
//! │    1.80 + 1.50 + 1.79 = 5.090000000000001  ❌                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer hundredths                                       │
//! │    180 + 150 + 179 = 509  → "5.09 ETH"                                  │
//! │                                                                         │
//! │  Floats only appear at the remote boundary, where the server sends      │
//! │  decimal numbers. They are converted ONCE with `from_decimal`.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nftcart_core::money::Money;
//!
//! let price = Money::from_cents(180);
//! let total = price + Money::from_cents(150) + Money::from_cents(179);
//! assert_eq!(total.cents(), 509);
//! assert_eq!(total.to_string(), "5.09 ETH");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::error::ValidationError;

/// Currency label used by [`Money`]'s `Display`.
pub const CURRENCY_LABEL: &str = "ETH";

/// Largest price magnitude accepted from the remote service, in hundredths.
///
/// One trillion ETH. Leaves room for tens of thousands of such items in one
/// total before `i64` saturates.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000_000;

// =============================================================================
// Money Type
// =============================================================================

/// A price in hundredths of the marketplace currency.
///
/// ## Design Decisions
/// - **i64**: prices are bounded by [`MAX_PRICE_CENTS`]; addition saturates
/// - **Single field tuple struct**: zero-cost abstraction
/// - **Ord**: prices compare exactly, which keeps price sorting total
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from hundredths.
    ///
    /// ## Example
    /// ```rust
    /// use nftcart_core::money::Money;
    ///
    /// let price = Money::from_cents(179); // 1.79
    /// assert_eq!(price.cents(), 179);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount received from the remote service.
    ///
    /// Rounds half away from zero to the nearest hundredth. Non-finite
    /// input and magnitudes above [`MAX_PRICE_CENTS`] are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use nftcart_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(1.79).unwrap().cents(), 179);
    /// assert_eq!(Money::from_decimal(0.005).unwrap().cents(), 1);
    /// assert!(Money::from_decimal(f64::NAN).is_err());
    /// assert!(Money::from_decimal(1e30).is_err());
    /// ```
    pub fn from_decimal(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: format!("{amount} is not a finite number"),
            });
        }

        let cents = (amount * 100.0).round();
        if cents.abs() > MAX_PRICE_CENTS as f64 {
            return Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: -MAX_PRICE_CENTS,
                max: MAX_PRICE_CENTS,
                // saturating float-to-int cast
                actual: cents as i64,
            });
        }

        Ok(Money(cents as i64))
    }

    /// Returns the value in hundredths.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn whole(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the amount as a float, for display layers that need one.
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} {}",
            sign,
            self.whole().abs(),
            self.cents_part(),
            CURRENCY_LABEL
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.whole(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(509).to_string(), "5.09 ETH");
        assert_eq!(Money::from_cents(500).to_string(), "5.00 ETH");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50 ETH");
        assert_eq!(Money::zero().to_string(), "0.00 ETH");
    }

    #[test]
    fn test_from_decimal_rounds_to_hundredths() {
        assert_eq!(Money::from_decimal(1.8).unwrap().cents(), 180);
        assert_eq!(Money::from_decimal(1.5).unwrap().cents(), 150);
        assert_eq!(Money::from_decimal(49.999).unwrap().cents(), 5000);
        assert!(Money::from_decimal(f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_decimal_rejects_unrepresentable_amounts() {
        let err = Money::from_decimal(1e30).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, actual, .. }
                if field == "price" && actual == i64::MAX
        ));
        assert!(Money::from_decimal(1e17).is_err());
        assert!(Money::from_decimal(-1e17).is_err());

        let max = MAX_PRICE_CENTS as f64 / 100.0;
        assert_eq!(Money::from_decimal(max).unwrap().cents(), MAX_PRICE_CENTS);
    }

    #[test]
    fn test_addition_saturates() {
        let near_max = Money::from_cents(i64::MAX - 1);
        assert_eq!((near_max + Money::from_cents(10)).cents(), i64::MAX);

        let mut total = near_max;
        total += Money::from_cents(10);
        assert_eq!(total.cents(), i64::MAX);

        let total: Money = [near_max, near_max, near_max].iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    /// The float sum drifts, the integer sum does not.
    #[test]
    fn test_sum_is_exact() {
        let prices = [1.80_f64, 1.50, 1.79];
        let total: Money = prices
            .iter()
            .map(|p| Money::from_decimal(*p).unwrap())
            .sum();
        assert_eq!(total.cents(), 509);
        assert!((total.as_decimal() - 5.09).abs() < 1e-9);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(-1).is_negative());
    }
}
