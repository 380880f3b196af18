//! # Money Module
//!
//! Provides the `Money` type for every price, discount and total in a cart.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PERCENTAGE DISCOUNTS ON FLOATS                                         │
//! │                                                                         │
//! │    3 × $11.23 × 33.33% = $11.228877  → which cent does the shop keep?   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Exact Decimal Rates                      │
//! │    3369 × 0.3333 = 1122.8877 (exact Decimal)                            │
//! │    ceil(1122.8877) = 1123 cents                                         │
//! │    Rounding happens once, on the amount, and always UP                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(311); // $3.11
//! let subtotal = price * 3;           // $9.33
//! assert_eq!(subtotal.cents(), 933);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money Flows
/// ```text
/// Product.price_in_cents ──► LineItem.subtotal ──► LineItem.total ──► Cart total
///                                                      ▲
///                        AppliedDiscount.amount ───────┘ (subtracted)
/// ```
///
/// Arithmetic saturates at the `i64` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1123);
    /// assert_eq!(price.cents(), 1123);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
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

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(500);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 1500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `ceil(self × rate)`: the share of this amount covered by a
    /// percentage discount, rounded UP to the next whole cent.
    ///
    /// ## Rounding Direction
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  CEILING ROUNDING ON DISCOUNT AMOUNTS                               │
    /// │                                                                     │
    /// │  amount × rate = 3369 × 0.3333 = 1122.8877                          │
    /// │                                                                     │
    /// │  floor  → 1122 cents off                                            │
    /// │  ceil   → 1123 cents off   ◄── THIS FUNCTION                        │
    /// │                                                                     │
    /// │  Any fractional cent of saving goes to the customer as a full cent. │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// One exact `Decimal` product, then a single ceiling. A rate never
    /// exceeds 100%, so the result never exceeds `self`; that is also the
    /// cap if the product cannot be represented.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::types::DiscountRate;
    ///
    /// let coffee = Money::from_cents(3369); // 3 × $11.23
    /// let saving = coffee.discount_ceil(DiscountRate::from_bps(3333));
    /// assert_eq!(saving.cents(), 1123);
    /// ```
    pub fn discount_ceil(&self, rate: DiscountRate) -> Money {
        Decimal::from(self.0)
            .checked_mul(rate.fraction())
            .and_then(|exact| exact.ceil().to_i64())
            .map_or(*self, Money::from_cents)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$D.CC`. For logs and tests only; UIs format their own.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
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
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
