//! # Domain Types
//!
//! Value types shared by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   CartEntry     │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  product        │──►│  product        │       │
//! │  │  name           │   │  quantity       │   │  quantity       │       │
//! │  │  price_in_cents │   └─────────────────┘   │  subtotal       │       │
//! │  └─────────────────┘                         │  total          │       │
//! │                                              │  discounts      │       │
//! │  ┌─────────────────┐                         └─────────────────┘       │
//! │  │  DiscountRate   │                                                   │
//! │  │  ─────────────  │                                                   │
//! │  │  exact Decimal  │                                                   │
//! │  │  0.3333 = 33.33%│                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::AppliedDiscount;
use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_discount_fraction, ValidationResult};

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage discount as an exact decimal fraction in `[0, 1]`.
///
/// ## Why Decimal?
/// The configured fraction is kept exactly (`0.123456` stays `0.123456`).
/// Rounding happens once, on the final discount amount in
/// [`Money::discount_ceil`], never on the rate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(#[ts(type = "string")] Decimal);

impl DiscountRate {
    /// Creates a rate from basis points (`3333` = 33.33%).
    pub fn from_bps(bps: u32) -> Self {
        DiscountRate(Decimal::new(i64::from(bps), 4).normalize())
    }

    /// Creates a rate from an exact fraction. Rejects values outside `[0, 1]`.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::types::DiscountRate;
    ///
    /// let rate = DiscountRate::from_decimal(Decimal::new(123456, 6)).unwrap();
    /// assert_eq!(rate.fraction().to_string(), "0.123456");
    /// assert!(DiscountRate::from_decimal(Decimal::new(15, 1)).is_err());
    /// ```
    pub fn from_decimal(fraction: Decimal) -> ValidationResult<Self> {
        validate_discount_fraction(fraction)?;
        Ok(DiscountRate(fraction.normalize()))
    }

    /// Creates a rate from a fraction read as a float (`0.5` = 50%).
    ///
    /// The float is taken at its shortest decimal spelling, so a value
    /// written as `0.3333` in a config file becomes exactly `0.3333`.
    /// NaN, infinities and values outside `[0, 1]` are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_fraction(0.3333).unwrap(), DiscountRate::from_bps(3333));
    /// assert!(DiscountRate::from_fraction(f64::NAN).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> ValidationResult<Self> {
        let spelled = fraction.to_string();
        let exact = Decimal::from_str(&spelled).map_err(|_| ValidationError::InvalidDecimal {
            field: "discount".to_string(),
            value: spelled,
        })?;
        Self::from_decimal(exact)
    }

    /// Returns the exact fraction.
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub fn zero() -> Self {
        DiscountRate(Decimal::ZERO)
    }

    /// 100% rate.
    #[inline]
    pub fn full() -> Self {
        DiscountRate(Decimal::ONE)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be placed in a cart.
///
/// Equality, hashing and ordering cover every field; ordering is by `id`
/// first, which is what makes cart iteration sorted by product id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Product code, matched against a discount rule's product set.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in cents. Never negative.
    pub price_in_cents: i64,
}

impl Product {
    /// Creates a product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_in_cents: i64) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price_in_cents,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_in_cents)
    }
}

// =============================================================================
// Cart Entry
// =============================================================================

/// One `(product, quantity)` pair of a cart.
///
/// This is the unit a discount resolver receives, and the key of the
/// discounts it hands back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: i64,
}

impl CartEntry {
    pub fn new(product: Product, quantity: i64) -> Self {
        CartEntry { product, quantity }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A priced cart line, rebuilt on every pricing pass.
///
/// ## Lifecycle
/// ```text
/// LineItem::new(product, qty)      subtotal = total = price × qty
///      │
///      ▼
/// rule_1.apply(item)               total -= amount_1, record appended
///      │
///      ▼
/// rule_2.apply(item)               total -= amount_2, record appended
///      │
///      ▼
/// summed into the cart total, then dropped
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product: Product,

    pub quantity: i64,

    /// `price × quantity`, fixed at creation.
    pub subtotal: Money,

    /// Running price after every discount applied so far.
    pub total: Money,

    /// Applied discounts in application order (oldest first).
    pub discounts: Vec<AppliedDiscount>,
}

impl LineItem {
    /// Builds the undiscounted line for a product and quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::{LineItem, Product};
    ///
    /// let tea = Product::new("GR1", "Green Tea", 311);
    /// let item = LineItem::new(tea, 3);
    /// assert_eq!(item.subtotal.cents(), 933);
    /// assert_eq!(item.total, item.subtotal);
    /// assert!(item.discounts.is_empty());
    /// ```
    pub fn new(product: Product, quantity: i64) -> Self {
        let subtotal = product.price().multiply_quantity(quantity);
        LineItem {
            product,
            quantity,
            subtotal,
            total: subtotal,
            discounts: Vec::new(),
        }
    }

    /// Sum of every applied discount amount.
    pub fn discount_total(&self) -> Money {
        self.discounts.iter().map(|d| d.amount).sum()
    }

    /// Applied discounts, most recently applied first.
    pub fn discounts_most_recent_first(&self) -> impl Iterator<Item = &AppliedDiscount> {
        self.discounts.iter().rev()
    }

    /// Checks if any discount changed this line.
    pub fn is_discounted(&self) -> bool {
        !self.discounts.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_rate_from_fraction() {
        assert_eq!(DiscountRate::from_fraction(0.5).unwrap(), DiscountRate::from_bps(5000));
        assert_eq!(DiscountRate::from_fraction(0.3333).unwrap(), DiscountRate::from_bps(3333));
        assert_eq!(DiscountRate::from_fraction(1.0).unwrap(), DiscountRate::full());
        assert_eq!(DiscountRate::from_fraction(0.0).unwrap(), DiscountRate::zero());
        assert_eq!(DiscountRate::from_bps(2500).fraction(), Decimal::new(25, 2));
    }

    #[test]
    fn test_discount_rate_keeps_sub_bps_precision() {
        let rate = DiscountRate::from_fraction(0.123456).unwrap();
        assert_eq!(rate.fraction(), Decimal::new(123456, 6));
        assert_ne!(rate, DiscountRate::from_bps(1235));
    }

    #[test]
    fn test_discount_rate_rejects_bad_fractions() {
        assert!(matches!(
            DiscountRate::from_fraction(1.5),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(DiscountRate::from_fraction(-0.1).is_err());
        assert!(matches!(
            DiscountRate::from_fraction(f64::INFINITY),
            Err(ValidationError::InvalidDecimal { .. })
        ));
        assert!(DiscountRate::from_fraction(f64::NAN).is_err());
    }

    #[test]
    fn test_discount_rate_serializes_as_decimal_string() {
        let json = serde_json::to_value(DiscountRate::from_bps(3333)).unwrap();
        assert_eq!(json, "0.3333");
    }

    #[test]
    fn test_product_ordering_by_id() {
        let coffee = Product::new("CF1", "Coffee", 1123);
        let tea = Product::new("GR1", "Green Tea", 311);
        assert!(coffee < tea);
        assert_eq!(tea.price().cents(), 311);
    }

    #[test]
    fn test_product_equality_covers_price() {
        let tea = Product::new("GR1", "Green Tea", 311);
        let repriced = Product::new("GR1", "Green Tea", 299);
        assert_ne!(tea, repriced);
        assert_eq!(tea, tea.clone());
    }

    #[test]
    fn test_line_item_without_discounts() {
        let item = LineItem::new(Product::new("SR1", "Strawberries", 500), 4);
        assert_eq!(item.quantity, 4);
        assert_eq!(item.subtotal.cents(), 2000);
        assert_eq!(item.total.cents(), 2000);
        assert!(item.discount_total().is_zero());
        assert!(!item.is_discounted());
    }

    #[test]
    fn test_line_item_serializes_money_as_cents() {
        let item = LineItem::new(Product::new("CF1", "Coffee", 1123), 1);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["subtotal"], 1123);
        assert_eq!(json["total"], 1123);
        assert_eq!(json["product"]["price_in_cents"], 1123);
        assert!(json["discounts"].as_array().unwrap().is_empty());
    }
}
