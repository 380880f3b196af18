//! # Cart Engine
//!
//! Owns the product → quantity mapping and prices it.
//!
//! ## Pricing Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart::list_line_items()                              │
//! │                                                                         │
//! │  products (BTreeMap, sorted by product)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  entries = [(product, qty), ...]                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolver.resolve(&entries)     ← exactly ONE call, never cached        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each entry:                                                        │
//! │      LineItem::new(product, qty)                                        │
//! │      fold rules in resolver order: item = rule.apply(item)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<LineItem>  ──►  calculate_total() = Σ line.total                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Semantics
//! A `Cart` is never mutated after construction. `add_product` returns a
//! new cart and leaves the receiver as it was, so an older snapshot can be
//! priced from any thread while newer carts are built from it. The resolver
//! is shared between snapshots through an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::resolver::{DiscountResolver, ResolvedDiscounts};
use crate::types::{CartEntry, LineItem, Product};
use crate::validation::{validate_product, validate_quantity};

// =============================================================================
// Cart Config
// =============================================================================

/// Construction options for a [`Cart`].
///
/// Without a resolver no discount ever applies.
#[derive(Clone, Default)]
pub struct CartConfig {
    pub discount_resolver: Option<Arc<dyn DiscountResolver>>,
}

impl CartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a discount resolver.
    pub fn with_discount_resolver<R>(mut self, resolver: R) -> Self
    where
        R: DiscountResolver + 'static,
    {
        self.discount_resolver = Some(Arc::new(resolver));
        self
    }
}

impl fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartConfig")
            .field("discount_resolver", &self.discount_resolver.is_some())
            .finish()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An immutable shopping cart.
///
/// ## Invariants
/// - Keys are unique by product (adding the same product increases quantity)
/// - Quantities are positive when built through `try_add_product`
///
/// ## Example
/// ```rust
/// use tally_core::cart::{Cart, CartConfig};
/// use tally_core::types::Product;
///
/// let tea = Product::new("GR1", "Green Tea", 311);
///
/// let empty = Cart::new(CartConfig::new());
/// let cart = empty.add_product(tea.clone(), 2).add_one(tea);
///
/// assert_eq!(cart.calculate_total().unwrap().cents(), 933);
/// assert!(empty.is_empty()); // the original is untouched
/// ```
#[derive(Clone, Default)]
pub struct Cart {
    products: BTreeMap<Product, i64>,
    discount_resolver: Option<Arc<dyn DiscountResolver>>,
}

impl Cart {
    /// Creates an empty cart with the configured resolver attached.
    pub fn new(config: CartConfig) -> Self {
        Cart {
            products: BTreeMap::new(),
            discount_resolver: config.discount_resolver,
        }
    }

    /// Returns a new cart with `quantity` more of `product`.
    ///
    /// `quantity` must be positive; this path does not check it. Use
    /// [`try_add_product`](Self::try_add_product) for untrusted input.
    pub fn add_product(&self, product: Product, quantity: i64) -> Cart {
        let mut products = self.products.clone();
        *products.entry(product).or_insert(0) += quantity;

        Cart {
            products,
            discount_resolver: self.discount_resolver.clone(),
        }
    }

    /// Returns a new cart with one more of `product`.
    pub fn add_one(&self, product: Product) -> Cart {
        self.add_product(product, 1)
    }

    /// Validating form of [`add_product`](Self::add_product).
    ///
    /// ## Errors
    /// - Blank product id or negative price
    /// - Quantity of zero or less
    pub fn try_add_product(&self, product: Product, quantity: i64) -> CoreResult<Cart> {
        validate_product(&product)?;
        validate_quantity(quantity)?;
        Ok(self.add_product(product, quantity))
    }

    /// Quantity of `product` in this cart (0 if absent).
    pub fn quantity_of(&self, product: &Product) -> i64 {
        self.products.get(product).copied().unwrap_or(0)
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.products.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.products.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn has_discount_resolver(&self) -> bool {
        self.discount_resolver.is_some()
    }

    /// The `(product, quantity)` pairs handed to the resolver, sorted by
    /// product.
    pub fn entries(&self) -> Vec<CartEntry> {
        self.products
            .iter()
            .map(|(product, &quantity)| CartEntry::new(product.clone(), quantity))
            .collect()
    }

    /// Prices every product in the cart.
    ///
    /// Calls the resolver once with all entries, then builds each line item
    /// and applies its rules in the order the resolver returned them. Lines
    /// come back sorted by product (id first).
    ///
    /// ## Errors
    /// [`CoreError::DiscountResolution`](crate::error::CoreError::DiscountResolution)
    /// if the resolver fails; no line items are returned in that case.
    pub fn list_line_items(&self) -> CoreResult<Vec<LineItem>> {
        let entries = self.entries();

        let resolved = match &self.discount_resolver {
            Some(resolver) => {
                debug!(entries = entries.len(), "Resolving discounts");
                resolver.resolve(&entries)?
            }
            None => ResolvedDiscounts::new(),
        };

        let items: Vec<LineItem> = entries
            .into_iter()
            .map(|entry| {
                let rules = resolved.rules_for(&entry);
                let CartEntry { product, quantity } = entry;
                rules
                    .iter()
                    .fold(LineItem::new(product, quantity), |item, rule| rule.apply(item))
            })
            .collect();

        debug!(
            lines = items.len(),
            discounted_lines = items.iter().filter(|i| i.is_discounted()).count(),
            "Cart priced"
        );

        Ok(items)
    }

    /// Sum of every line total. Zero for an empty cart.
    pub fn calculate_total(&self) -> CoreResult<Money> {
        Ok(self.list_line_items()?.iter().map(|item| item.total).sum())
    }

    /// Prices the cart and summarizes it.
    pub fn totals(&self) -> CoreResult<CartTotals> {
        Ok(CartTotals::from_line_items(&self.list_line_items()?))
    }
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("products", &self.products)
            .field("discount_resolver", &self.discount_resolver.is_some())
            .finish()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Summary of a priced cart, for receipts and UI footers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount_total: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn from_line_items(items: &[LineItem]) -> Self {
        CartTotals {
            line_count: items.len(),
            total_quantity: items.iter().map(|i| i.quantity).sum(),
            subtotal: items.iter().map(|i| i.subtotal).sum(),
            discount_total: items.iter().map(LineItem::discount_total).sum(),
            total: items.iter().map(|i| i.total).sum(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
