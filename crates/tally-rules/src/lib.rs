//! # tally-rules: Rule Tables & Checkout Configuration
//!
//! Wires tally-core carts to discount rules declared in config files.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout.toml ──► CheckoutConfig ──► Vec<DiscountRule>                 │
//! │   (or .json)       (unknown keys         │                              │
//! │                     rejected)            ▼                              │
//! │                                   RuleTableResolver                     │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                              Cart::new(CartConfig { resolver })         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `CheckoutConfig` loading, validation, cart building
//! - [`resolver`] - `RuleTableResolver`
//! - [`error`] - `RulesError`
//!
//! ## Example
//! ```rust
//! use tally_core::Product;
//! use tally_rules::CheckoutConfig;
//!
//! let config = CheckoutConfig::from_toml_str(r#"
//!     discount_resolver = "rule_table"
//!
//!     [[discounts]]
//!     name = "Strawberry bulk"
//!     discount_type = "unit_price"
//!     discount = 50
//!     minimum_quantity = 3
//!     products = ["SR1"]
//! "#).unwrap();
//!
//! let cart = config
//!     .build_cart()
//!     .unwrap()
//!     .add_product(Product::new("SR1", "Strawberries", 500), 3);
//!
//! assert_eq!(cart.calculate_total().unwrap().cents(), 1350);
//! ```

pub mod config;
pub mod error;
pub mod resolver;

pub use config::{CheckoutConfig, DiscountRuleConfig, ResolverKind};
pub use error::{RulesError, RulesResult};
pub use resolver::RuleTableResolver;
