//! # Discount Rules
//!
//! A discount rule describes one discount's shape and knows how to apply
//! itself to a line item.
//!
//! ## Application Algorithms
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DiscountRule::apply(line_item)                       │
//! │                                                                         │
//! │  discounted_qty = quantity − (quantity mod bundle_size)                 │
//! │                   (only whole bundles; the remainder pays full price)   │
//! │                                                                         │
//! │  ┌────────────────┬──────────────────────────────────────────────────┐ │
//! │  │ Percentage     │ amount = ceil(discounted_qty × price × rate)     │ │
//! │  │ UnitPrice      │ amount = discounted_qty × cents_per_unit         │ │
//! │  │ Unknown        │ line item returned unchanged                     │ │
//! │  └────────────────┴──────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  total -= amount                                                        │
//! │  discounts.push((rule, discounted_qty, amount))                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every amount is computed from the line's quantity and unit price, never
//! from its running total, so several rules on one line add up instead of
//! compounding.
//!
//! `minimum_quantity` and `products` are eligibility data. The rule carries
//! them but never checks them; a [`DiscountResolver`](crate::resolver::DiscountResolver)
//! decides which rules reach a line.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountRate, LineItem};

// =============================================================================
// Discount Kind
// =============================================================================

/// How a rule turns a quantity into a discount amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// A share of the discounted units' price, rounded up to whole cents.
    Percentage(DiscountRate),

    /// A fixed amount off every discounted unit.
    UnitPrice(Money),

    /// A discount type this engine does not implement. Applying it is a no-op
    /// so resolvers can hand over rules meant for other systems.
    Unknown(String),
}

impl DiscountKind {
    /// The `discount_type` name this kind is configured with.
    pub fn type_name(&self) -> &str {
        match self {
            DiscountKind::Percentage(_) => "percentage",
            DiscountKind::UnitPrice(_) => "unit_price",
            DiscountKind::Unknown(name) => name,
        }
    }
}

// =============================================================================
// Discount Rule
// =============================================================================

/// An immutable discount rule.
///
/// ## Example
/// ```rust
/// use tally_core::discount::DiscountRule;
/// use tally_core::types::{DiscountRate, LineItem, Product};
///
/// // Buy one get one free: 50% off every complete pair
/// let bogof = DiscountRule::percentage("Green tea BOGOF", DiscountRate::from_bps(5000))
///     .with_bundle_size(2)
///     .unwrap()
///     .with_products(["GR1"]);
///
/// let tea = Product::new("GR1", "Green Tea", 311);
/// let item = bogof.apply(LineItem::new(tea, 3));
///
/// assert_eq!(item.subtotal.cents(), 933);
/// assert_eq!(item.total.cents(), 622); // third tea pays full price
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct DiscountRule {
    name: String,
    kind: DiscountKind,
    minimum_quantity: i64,
    bundle_size: i64,
    products: BTreeSet<String>,
}

impl DiscountRule {
    /// Creates a rule with `minimum_quantity = 1`, `bundle_size = 1` and no
    /// target products.
    pub fn new(name: impl Into<String>, kind: DiscountKind) -> Self {
        DiscountRule {
            name: name.into(),
            kind,
            minimum_quantity: 1,
            bundle_size: 1,
            products: BTreeSet::new(),
        }
    }

    /// Shorthand for a [`DiscountKind::Percentage`] rule.
    pub fn percentage(name: impl Into<String>, rate: DiscountRate) -> Self {
        Self::new(name, DiscountKind::Percentage(rate))
    }

    /// Shorthand for a [`DiscountKind::UnitPrice`] rule.
    pub fn unit_price(name: impl Into<String>, per_unit: Money) -> Self {
        Self::new(name, DiscountKind::UnitPrice(per_unit))
    }

    /// Sets the bundle size. Fails unless `bundle_size >= 1`.
    pub fn with_bundle_size(mut self, bundle_size: i64) -> CoreResult<Self> {
        if bundle_size < 1 {
            return Err(CoreError::InvalidBundleSize {
                rule: self.name,
                bundle_size,
            });
        }
        self.bundle_size = bundle_size;
        Ok(self)
    }

    /// Sets the eligibility threshold read by resolvers.
    pub fn with_minimum_quantity(mut self, minimum_quantity: i64) -> Self {
        self.minimum_quantity = minimum_quantity;
        self
    }

    /// Sets the product ids this rule targets.
    pub fn with_products<I, S>(mut self, product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = product_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DiscountKind {
        &self.kind
    }

    pub fn minimum_quantity(&self) -> i64 {
        self.minimum_quantity
    }

    pub fn bundle_size(&self) -> i64 {
        self.bundle_size
    }

    pub fn products(&self) -> &BTreeSet<String> {
        &self.products
    }

    /// Checks if `product_id` is in this rule's product set.
    pub fn targets(&self, product_id: &str) -> bool {
        self.products.contains(product_id)
    }

    /// Largest multiple of `bundle_size` not above `quantity`.
    #[inline]
    pub fn discounted_quantity(&self, quantity: i64) -> i64 {
        quantity - quantity % self.bundle_size
    }

    /// Applies this rule to a line item and returns the updated item.
    ///
    /// Unknown discount kinds return the item untouched.
    pub fn apply(&self, mut item: LineItem) -> LineItem {
        let discounted_quantity = self.discounted_quantity(item.quantity);

        let amount = match &self.kind {
            DiscountKind::Percentage(rate) => item
                .product
                .price()
                .multiply_quantity(discounted_quantity)
                .discount_ceil(*rate),
            DiscountKind::UnitPrice(per_unit) => per_unit.multiply_quantity(discounted_quantity),
            DiscountKind::Unknown(discount_type) => {
                debug!(
                    rule = %self.name,
                    discount_type = %discount_type,
                    product_id = %item.product.id,
                    "Skipping discount of unknown type"
                );
                return item;
            }
        };

        item.total -= amount;
        item.discounts.push(AppliedDiscount {
            rule: self.clone(),
            discounted_quantity,
            amount,
        });
        item
    }
}

// =============================================================================
// Applied Discount
// =============================================================================

/// Record of one rule applied to one line item.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct AppliedDiscount {
    pub rule: DiscountRule,

    /// Units the amount was computed over (whole bundles only).
    pub discounted_quantity: i64,

    /// Amount taken off the line total.
    pub amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use proptest::prelude::*;

    fn green_tea() -> Product {
        Product::new("GR1", "Green Tea", 311)
    }

    fn bogof() -> DiscountRule {
        DiscountRule::percentage("Green tea BOGOF", DiscountRate::from_bps(5000))
            .with_bundle_size(2)
            .unwrap()
            .with_products(["GR1"])
    }

    #[test]
    fn test_rule_defaults() {
        let rule = DiscountRule::unit_price("Berry deal", Money::from_cents(50));
        assert_eq!(rule.minimum_quantity(), 1);
        assert_eq!(rule.bundle_size(), 1);
        assert!(rule.products().is_empty());
        assert_eq!(rule.kind().type_name(), "unit_price");
    }

    #[test]
    fn test_bundle_size_must_be_positive() {
        let err = DiscountRule::percentage("Broken", DiscountRate::full())
            .with_bundle_size(0)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidBundleSize { bundle_size: 0, .. }
        ));
        assert!(DiscountRule::percentage("Broken", DiscountRate::full())
            .with_bundle_size(-2)
            .is_err());
    }

    #[test]
    fn test_targets() {
        let rule = bogof();
        assert!(rule.targets("GR1"));
        assert!(!rule.targets("CF1"));
    }

    #[test]
    fn test_percentage_whole_bundle() {
        // 2 units, one bundle: ceil(2 × 311 × 0.5) = 311
        let item = bogof().apply(LineItem::new(green_tea(), 2));
        assert_eq!(item.subtotal.cents(), 622);
        assert_eq!(item.total.cents(), 311);
        assert_eq!(item.discounts.len(), 1);
        assert_eq!(item.discounts[0].discounted_quantity, 2);
        assert_eq!(item.discounts[0].amount.cents(), 311);
    }

    #[test]
    fn test_percentage_remainder_pays_full_price() {
        let item = bogof().apply(LineItem::new(green_tea(), 3));
        assert_eq!(item.discounts[0].discounted_quantity, 2);
        assert_eq!(item.total.cents(), 933 - 311);
    }

    #[test]
    fn test_percentage_below_one_bundle_records_zero() {
        let item = bogof().apply(LineItem::new(green_tea(), 1));
        assert_eq!(item.total.cents(), 311);
        assert_eq!(item.discounts.len(), 1);
        assert_eq!(item.discounts[0].discounted_quantity, 0);
        assert!(item.discounts[0].amount.is_zero());
    }

    #[test]
    fn test_percentage_rounds_up() {
        // 3 × 1123 × 0.3333 = 1122.8877 → 1123
        let rule = DiscountRule::percentage("Coffee third off", DiscountRate::from_bps(3333));
        let item = rule.apply(LineItem::new(Product::new("CF1", "Coffee", 1123), 3));
        assert_eq!(item.discounts[0].amount.cents(), 1123);
        assert_eq!(item.total.cents(), 3369 - 1123);

        // 1 × 311 × 0.5 = 155.5 → 156
        let half = DiscountRule::percentage("Half", DiscountRate::from_bps(5000));
        let item = half.apply(LineItem::new(green_tea(), 1));
        assert_eq!(item.discounts[0].amount.cents(), 156);
        assert_eq!(item.total.cents(), 155);
    }

    #[test]
    fn test_unit_price() {
        let rule = DiscountRule::unit_price("Berry deal", Money::from_cents(50));
        let item = rule.apply(LineItem::new(Product::new("SR1", "Strawberries", 500), 3));
        assert_eq!(item.discounts[0].discounted_quantity, 3);
        assert_eq!(item.discounts[0].amount.cents(), 150);
        assert_eq!(item.total.cents(), 1350);
    }

    #[test]
    fn test_unit_price_respects_bundles() {
        let rule = DiscountRule::unit_price("Triples", Money::from_cents(50))
            .with_bundle_size(3)
            .unwrap();
        let item = rule.apply(LineItem::new(Product::new("SR1", "Strawberries", 500), 7));
        assert_eq!(item.discounts[0].discounted_quantity, 6);
        assert_eq!(item.total.cents(), 3500 - 300);
    }

    #[test]
    fn test_unknown_kind_is_identity() {
        let rule = DiscountRule::new("Loyalty points", DiscountKind::Unknown("points".into()));
        let before = LineItem::new(green_tea(), 4);
        let after = rule.apply(before.clone());
        assert_eq!(after, before);
        assert_eq!(rule.kind().type_name(), "points");
    }

    #[test]
    fn test_rules_are_additive_not_compounding() {
        let half = DiscountRule::percentage("Half", DiscountRate::from_bps(5000));
        let fixed = DiscountRule::unit_price("Ten off", Money::from_cents(10));

        let item = LineItem::new(Product::new("P1", "Thing", 1000), 2);
        let item = fixed.apply(half.apply(item));

        // 50% of the original 2000, not of a reduced total
        assert_eq!(item.discounts[0].amount.cents(), 1000);
        assert_eq!(item.discounts[1].amount.cents(), 20);
        assert_eq!(item.total.cents(), 2000 - 1000 - 20);
        assert_eq!(item.discount_total().cents(), 1020);
        assert_eq!(item.quantity, 2);

        let names: Vec<&str> = item
            .discounts_most_recent_first()
            .map(|d| d.rule.name())
            .collect();
        assert_eq!(names, ["Ten off", "Half"]);
    }

    #[test]
    fn test_rule_is_reusable_across_items() {
        let rule = bogof();
        let a = rule.apply(LineItem::new(green_tea(), 2));
        let b = rule.apply(LineItem::new(green_tea(), 4));
        assert_eq!(a.total.cents(), 311);
        assert_eq!(b.total.cents(), 622);
        assert_eq!(rule, bogof());
    }

    #[test]
    fn test_serialized_kind_shape() {
        let json = serde_json::to_value(bogof()).unwrap();
        assert_eq!(json["kind"]["percentage"], "0.5");
        assert_eq!(json["bundle_size"], 2);
        assert_eq!(json["products"][0], "GR1");
    }

    #[test]
    fn test_oversized_unit_discount_does_not_overflow() {
        let rule = DiscountRule::unit_price("Runaway", Money::from_cents(i64::MAX));
        let item = LineItem::new(green_tea(), 3);

        let item = rule.apply(rule.apply(item));
        assert_eq!(item.discounts[0].amount.cents(), i64::MAX);
        assert_eq!(item.total.cents(), i64::MIN);
    }

    #[test]
    fn test_percentage_keeps_sub_bps_fraction() {
        let rate = DiscountRate::from_fraction(0.123456).unwrap();
        let rule = DiscountRule::percentage("Odd rate", rate);
        let item = rule.apply(LineItem::new(Product::new("P", "Pricey", 100_000), 1));
        assert_eq!(item.discounts[0].amount.cents(), 12_346);
        assert_eq!(item.total.cents(), 87_654);
    }

    proptest! {
        #[test]
        fn remainder_units_are_never_discounted(
            quantity in 1i64..500,
            bundle_size in 1i64..12,
            price in 0i64..5_000,
        ) {
            let rule = DiscountRule::unit_price("Per unit", Money::from_cents(1))
                .with_bundle_size(bundle_size)
                .unwrap();
            let item = rule.apply(LineItem::new(Product::new("P", "P", price), quantity));
            let record = &item.discounts[0];
            prop_assert_eq!(quantity - record.discounted_quantity, quantity % bundle_size);
            prop_assert_eq!(record.discounted_quantity % bundle_size, 0);
            prop_assert_eq!(record.amount.cents(), record.discounted_quantity);
        }

        #[test]
        fn percentage_amount_is_ceiling(
            quantity in 1i64..200,
            bundle_size in 1i64..6,
            price in 0i64..10_000,
            bps in 0u32..=10_000,
        ) {
            let rule = DiscountRule::percentage("Pct", DiscountRate::from_bps(bps))
                .with_bundle_size(bundle_size)
                .unwrap();
            let item = rule.apply(LineItem::new(Product::new("P", "P", price), quantity));
            let record = &item.discounts[0];
            let exact = record.discounted_quantity as i128 * price as i128 * bps as i128;
            let expected = (exact + 9_999) / 10_000;
            prop_assert_eq!(record.amount.cents() as i128, expected);
            prop_assert_eq!(item.total, item.subtotal - record.amount);
        }
    }
}
