//! # Checkout Configuration
//!
//! Declarative cart setup: which resolver a cart uses and which discounts
//! the rule table holds.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_DISCOUNT_RESOLVER=rule_table                                 │
//! │                                                                         │
//! │  2. Config File                                                        │
//! │     explicit path, else TALLY_RULES_PATH                               │
//! │     *.json → JSON, anything else → TOML                                │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no resolver, no discounts                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! discount_resolver = "rule_table"   # rule_table | none
//!
//! [[discounts]]
//! name = "Green tea BOGOF"
//! discount_type = "percentage"       # percentage | unit_price | (other: ignored)
//! discount = 0.5                     # fraction for percentage, cents for unit_price
//! bundle_size = 2                    # default 1
//! minimum_quantity = 1               # default 1
//! products = ["GR1"]
//! ```
//!
//! Every table rejects keys it does not know, so a typo fails the load
//! instead of silently dropping an option.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_core::validation::{
    validate_bundle_size, validate_minimum_quantity, validate_unit_discount_cents,
};
use tally_core::{Cart, CartConfig, DiscountKind, DiscountRate, DiscountRule, Money};
use tracing::{debug, info, warn};

use crate::error::{RulesError, RulesResult};
use crate::resolver::RuleTableResolver;

/// Environment variable naming the config file.
pub const RULES_PATH_ENV: &str = "TALLY_RULES_PATH";

/// Environment variable overriding `discount_resolver`.
pub const RESOLVER_ENV: &str = "TALLY_DISCOUNT_RESOLVER";

// =============================================================================
// Resolver Kind
// =============================================================================

/// Which discount resolver a configured cart gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// No resolver: nothing is ever discounted.
    #[default]
    None,

    /// [`RuleTableResolver`] over the configured `discounts`.
    RuleTable,
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverKind::None => write!(f, "none"),
            ResolverKind::RuleTable => write!(f, "rule_table"),
        }
    }
}

impl std::str::FromStr for ResolverKind {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ResolverKind::None),
            "rule_table" => Ok(ResolverKind::RuleTable),
            other => Err(RulesError::InvalidConfig(format!(
                "Unknown discount resolver: '{}'. Valid options: none, rule_table",
                other
            ))),
        }
    }
}

// =============================================================================
// Discount Rule Config
// =============================================================================

/// One `[[discounts]]` entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountRuleConfig {
    pub name: String,

    /// `percentage`, `unit_price`, or any other name (kept, never applied).
    pub discount_type: String,

    /// Fraction in `[0, 1]` for `percentage`; whole cents for `unit_price`.
    pub discount: f64,

    #[serde(default = "default_minimum_quantity")]
    pub minimum_quantity: i64,

    #[serde(default = "default_bundle_size")]
    pub bundle_size: i64,

    /// Product ids the discount targets.
    #[serde(default)]
    pub products: Vec<String>,
}

fn default_minimum_quantity() -> i64 {
    1
}

fn default_bundle_size() -> i64 {
    1
}

impl DiscountRuleConfig {
    /// Converts the declaration into a validated [`DiscountRule`].
    pub fn to_rule(&self) -> RulesResult<DiscountRule> {
        let invalid = |reason: String| RulesError::InvalidRule {
            rule: self.name.clone(),
            reason,
        };

        validate_bundle_size(self.bundle_size).map_err(|e| invalid(e.to_string()))?;
        validate_minimum_quantity(self.minimum_quantity).map_err(|e| invalid(e.to_string()))?;

        let kind = match self.discount_type.as_str() {
            "percentage" => DiscountKind::Percentage(
                DiscountRate::from_fraction(self.discount).map_err(|e| invalid(e.to_string()))?,
            ),
            "unit_price" => DiscountKind::UnitPrice(Money::from_cents(
                validate_unit_discount_cents(self.discount).map_err(|e| invalid(e.to_string()))?,
            )),
            other => {
                debug!(rule = %self.name, discount_type = %other, "Keeping discount of unknown type");
                DiscountKind::Unknown(other.to_string())
            }
        };

        Ok(DiscountRule::new(self.name.clone(), kind)
            .with_bundle_size(self.bundle_size)?
            .with_minimum_quantity(self.minimum_quantity)
            .with_products(self.products.iter().cloned()))
    }
}

// =============================================================================
// Checkout Config
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub discount_resolver: ResolverKind,

    #[serde(default)]
    pub discounts: Vec<DiscountRuleConfig>,
}

impl CheckoutConfig {
    /// Creates a config with defaults: no resolver, no discounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses TOML. Unknown keys are rejected.
    pub fn from_toml_str(contents: &str) -> RulesResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses JSON. Unknown keys are rejected.
    pub fn from_json_str(contents: &str) -> RulesResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path`, else `TALLY_RULES_PATH`
    /// 3. Environment variables
    ///
    /// A config path that does not exist falls back to the defaults.
    pub fn load(config_path: Option<PathBuf>) -> RulesResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with the environment supplied by `env`.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> RulesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(|| env(RULES_PATH_ENV).map(PathBuf::from)) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                config = Self::read_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        if let Some(value) = env(RESOLVER_ENV) {
            config.override_resolver(&value)?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Saves configuration as TOML.
    pub fn save(&self, path: &Path) -> RulesResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RulesError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| RulesError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    /// Replaces the resolver choice from its textual name.
    pub fn override_resolver(&mut self, value: &str) -> RulesResult<()> {
        let kind: ResolverKind = value.parse()?;
        debug!(resolver = %kind, "Overriding discount resolver");
        self.discount_resolver = kind;
        Ok(())
    }

    /// Checks that every declared discount builds a valid rule.
    pub fn validate(&self) -> RulesResult<()> {
        self.rules().map(|_| ())
    }

    /// Builds the declared rules in declaration order.
    pub fn rules(&self) -> RulesResult<Vec<DiscountRule>> {
        self.discounts.iter().map(DiscountRuleConfig::to_rule).collect()
    }

    /// Builds the [`CartConfig`] this file describes.
    pub fn cart_config(&self) -> RulesResult<CartConfig> {
        let rules = self.rules()?;

        match self.discount_resolver {
            ResolverKind::None => {
                if !rules.is_empty() {
                    warn!(
                        discounts = rules.len(),
                        "Discounts configured without a resolver; they will never apply"
                    );
                }
                Ok(CartConfig::new())
            }
            ResolverKind::RuleTable => {
                Ok(CartConfig::new().with_discount_resolver(RuleTableResolver::new(rules)))
            }
        }
    }

    /// Builds an empty cart wired with the configured resolver.
    pub fn build_cart(&self) -> RulesResult<Cart> {
        Ok(Cart::new(self.cart_config()?))
    }

    fn read_file(path: &Path) -> RulesResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(toml::from_str(&contents)?)
        }
    }
}
