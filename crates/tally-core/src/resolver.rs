//! # Discount Resolver
//!
//! The seam between the pricing engine and whatever knows which discounts
//! apply (a rule table, a database, a promotions service).
//!
//! ## Batch Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE call per pricing pass, with EVERY cart entry                       │
//! │                                                                         │
//! │  Cart ──[ (GR1, 3), (SR1, 1), (CF1, 1) ]──► DiscountResolver            │
//! │                                                   │                     │
//! │        (GR1, 3) → [Green tea BOGOF]  ◄────────────┘                     │
//! │        (SR1, 1) → []              (absent keys mean no discounts)       │
//! │        (CF1, 1) → []                                                    │
//! │                                                                         │
//! │  A database-backed resolver runs one query instead of one per product.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any `Fn(&[CartEntry]) -> CoreResult<ResolvedDiscounts> + Send + Sync`
//! is a resolver, which keeps fakes in tests down to a closure.

use std::collections::HashMap;

use crate::discount::DiscountRule;
use crate::error::CoreResult;
use crate::types::CartEntry;

// =============================================================================
// Resolved Discounts
// =============================================================================

/// Resolver output: the ordered rules for each cart entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedDiscounts {
    rules: HashMap<CartEntry, Vec<DiscountRule>>,
}

impl ResolvedDiscounts {
    /// Empty result: nothing is discounted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rules for an entry, replacing any earlier ones.
    pub fn insert(&mut self, entry: CartEntry, rules: Vec<DiscountRule>) {
        self.rules.insert(entry, rules);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, entry: CartEntry, rules: Vec<DiscountRule>) -> Self {
        self.insert(entry, rules);
        self
    }

    /// Rules for an entry, in application order. Empty for absent entries.
    pub fn rules_for(&self, entry: &CartEntry) -> &[DiscountRule] {
        self.rules.get(entry).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of entries with at least one rule.
    pub fn discounted_entries(&self) -> usize {
        self.rules.values().filter(|rules| !rules.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.discounted_entries() == 0
    }
}

impl FromIterator<(CartEntry, Vec<DiscountRule>)> for ResolvedDiscounts {
    fn from_iter<I: IntoIterator<Item = (CartEntry, Vec<DiscountRule>)>>(iter: I) -> Self {
        ResolvedDiscounts {
            rules: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Resolver Trait
// =============================================================================

/// Maps a cart's entries to the discount rules that apply to each.
///
/// ## Contract
/// - Called exactly once per pricing pass, with every entry of the cart
/// - Rule order in the result is the order rules are applied
/// - May block on I/O; the engine does not time out or retry the call
/// - An `Err` aborts the pricing pass before any line item is produced
pub trait DiscountResolver: Send + Sync {
    fn resolve(&self, entries: &[CartEntry]) -> CoreResult<ResolvedDiscounts>;
}

impl<F> DiscountResolver for F
where
    F: Fn(&[CartEntry]) -> CoreResult<ResolvedDiscounts> + Send + Sync,
{
    fn resolve(&self, entries: &[CartEntry]) -> CoreResult<ResolvedDiscounts> {
        self(entries)
    }
}

/// A resolver that never discounts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscounts;

impl DiscountResolver for NoDiscounts {
    fn resolve(&self, _entries: &[CartEntry]) -> CoreResult<ResolvedDiscounts> {
        Ok(ResolvedDiscounts::new())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::Product;

    fn entry(id: &str, quantity: i64) -> CartEntry {
        CartEntry::new(Product::new(id, id, 100), quantity)
    }

    #[test]
    fn test_absent_entry_has_no_rules() {
        let resolved = ResolvedDiscounts::new();
        assert!(resolved.rules_for(&entry("A", 1)).is_empty());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_lookup_is_by_product_and_quantity() {
        let rule = DiscountRule::unit_price("Ten off", Money::from_cents(10));
        let resolved = ResolvedDiscounts::new().with(entry("A", 3), vec![rule.clone()]);

        assert_eq!(resolved.rules_for(&entry("A", 3)), [rule]);
        assert!(resolved.rules_for(&entry("A", 2)).is_empty());
        assert_eq!(resolved.discounted_entries(), 1);
    }

    #[test]
    fn test_empty_rule_lists_do_not_count() {
        let resolved: ResolvedDiscounts = vec![(entry("A", 1), Vec::new())].into_iter().collect();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_closure_is_a_resolver() {
        let resolver = |entries: &[CartEntry]| -> CoreResult<ResolvedDiscounts> {
            Ok(entries
                .iter()
                .map(|e| {
                    let rule = DiscountRule::unit_price("One off", Money::from_cents(1));
                    (e.clone(), vec![rule])
                })
                .collect())
        };
        let entries = [entry("A", 1), entry("B", 2)];
        let resolved = resolver.resolve(&entries).unwrap();
        assert_eq!(resolved.discounted_entries(), 2);
    }

    #[test]
    fn test_failing_resolver() {
        let resolver =
            |_: &[CartEntry]| -> CoreResult<ResolvedDiscounts> { Err(CoreError::resolution("down")) };
        assert!(matches!(
            resolver.resolve(&[entry("A", 1)]),
            Err(CoreError::DiscountResolution { .. })
        ));
    }

    #[test]
    fn test_no_discounts() {
        let resolved = NoDiscounts.resolve(&[entry("A", 5)]).unwrap();
        assert!(resolved.is_empty());
    }
}
