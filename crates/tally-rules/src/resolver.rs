//! # Rule Table Resolver
//!
//! The reference [`DiscountResolver`]: a fixed list of rules, matched by
//! product membership and minimum quantity.
//!
//! ## Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each cart entry (product, qty):                                    │
//! │                                                                         │
//! │    index[product.id] ──► rule positions, in declaration order           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    keep rule if qty >= rule.minimum_quantity                            │
//! │                                                                         │
//! │  The index is built once, so a pass costs one map lookup per entry      │
//! │  instead of a scan over every rule.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tally_core::{CartEntry, CoreResult, DiscountResolver, DiscountRule, ResolvedDiscounts};
use tracing::debug;

/// Resolves discounts from an in-memory rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTableResolver {
    rules: Vec<DiscountRule>,
    by_product: HashMap<String, Vec<usize>>,
}

impl RuleTableResolver {
    /// Builds the table. Rule order is application order.
    pub fn new(rules: Vec<DiscountRule>) -> Self {
        let mut by_product: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            for product_id in rule.products() {
                by_product
                    .entry(product_id.clone())
                    .or_default()
                    .push(position);
            }
        }

        RuleTableResolver { rules, by_product }
    }

    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Rules that apply to one entry, in declaration order.
    pub fn applicable(&self, entry: &CartEntry) -> Vec<DiscountRule> {
        self.by_product
            .get(&entry.product.id)
            .into_iter()
            .flatten()
            .map(|&position| &self.rules[position])
            .filter(|rule| entry.quantity >= rule.minimum_quantity())
            .cloned()
            .collect()
    }
}

impl DiscountResolver for RuleTableResolver {
    fn resolve(&self, entries: &[CartEntry]) -> CoreResult<ResolvedDiscounts> {
        let resolved: ResolvedDiscounts = entries
            .iter()
            .map(|entry| (entry.clone(), self.applicable(entry)))
            .filter(|(_, rules)| !rules.is_empty())
            .collect();

        debug!(
            entries = entries.len(),
            discounted = resolved.discounted_entries(),
            "Resolved discounts from rule table"
        );

        Ok(resolved)
    }
}
