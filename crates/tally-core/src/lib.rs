//! # tally-core: Pure Cart Pricing for Tally
//!
//! This crate prices shopping carts: it turns products and quantities into
//! line items, applies discount rules to them and totals the result. It has
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Caller (catalog, checkout UI, order service)           │   │
//! │  │        supplies Products and a DiscountResolver                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │ resolver  │  │ discount  │  │   types   │  │   │
//! │  │   │   Cart    │─►│ Discount  │─►│ Discount  │─►│ LineItem  │  │   │
//! │  │   │  totals   │  │ Resolver  │  │   Rule    │  │ Product   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            tally-rules (rule tables, config files)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The immutable Cart and its pricing pass
//! - [`resolver`] - The batch discount-resolution interface
//! - [`discount`] - Discount rules and how they apply
//! - [`types`] - Product, LineItem, DiscountRate
//! - [`money`] - Integer-cent Money
//! - [`validation`] - Input checks for the checked paths
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{Cart, CartConfig, CartEntry, CoreResult, DiscountRate, DiscountRule};
//! use tally_core::{Product, ResolvedDiscounts};
//!
//! let bogof = DiscountRule::percentage("Green tea BOGOF", DiscountRate::from_bps(5000))
//!     .with_bundle_size(2)
//!     .unwrap();
//!
//! let config = CartConfig::new().with_discount_resolver(
//!     move |entries: &[CartEntry]| -> CoreResult<ResolvedDiscounts> {
//!         Ok(entries
//!             .iter()
//!             .filter(|e| e.product.id == "GR1")
//!             .map(|e| (e.clone(), vec![bogof.clone()]))
//!             .collect())
//!     },
//! );
//!
//! let cart = Cart::new(config).add_product(Product::new("GR1", "Green Tea", 311), 2);
//! assert_eq!(cart.calculate_total().unwrap().cents(), 311);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod resolver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartConfig, CartTotals};
pub use discount::{AppliedDiscount, DiscountKind, DiscountRule};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use resolver::{DiscountResolver, NoDiscounts, ResolvedDiscounts};
pub use types::*;
