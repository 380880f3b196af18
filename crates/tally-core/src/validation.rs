//! # Validation Module
//!
//! Input checks for the checked cart path and for rule configuration.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Caller (catalog, UI, config file)                                     │
//! │  ├── Cart::try_add_product   → validate_product + validate_quantity    │
//! │  └── tally-rules config      → validate_unit_discount_cents,           │
//! │                                validate_bundle_size, ...               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Pricing engine (unchecked: trusts its inputs)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_quantity, validate_price_cents};
//!
//! assert!(validate_quantity(3).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_price_cents(-1).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a cart quantity: must be positive (> 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a product before it enters a cart.
///
/// ## Rules
/// - `id` must not be blank
/// - `price_in_cents` must be non-negative
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    validate_price_cents(product.price_in_cents)
}

/// Validates a percentage discount fraction: 0 to 1 inclusive.
pub fn validate_discount_fraction(fraction: Decimal) -> ValidationResult<()> {
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 1,
        });
    }

    Ok(())
}

/// Validates a fixed per-unit discount read as a float: a whole,
/// non-negative number of cents that fits in `i64`.
pub fn validate_unit_discount_cents(cents: f64) -> ValidationResult<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if !cents.is_finite() || cents.fract() != 0.0 {
        return Err(ValidationError::InvalidDecimal {
            field: "discount".to_string(),
            value: cents.to_string(),
        });
    }
    if cents < 0.0 || cents >= i64::MAX as f64 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(cents as i64)
}

/// Validates a bundle size: must be at least 1.
pub fn validate_bundle_size(bundle_size: i64) -> ValidationResult<()> {
    if bundle_size < 1 {
        return Err(ValidationError::MustBePositive {
            field: "bundle_size".to_string(),
        });
    }

    Ok(())
}

/// Validates a minimum quantity threshold: must be non-negative.
pub fn validate_minimum_quantity(minimum_quantity: i64) -> ValidationResult<()> {
    if minimum_quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "minimum_quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1123).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&Product::new("GR1", "Green Tea", 311)).is_ok());
        assert!(matches!(
            validate_product(&Product::new("  ", "Blank", 311)),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_product(&Product::new("BAD", "Negative", -1)).is_err());
    }

    #[test]
    fn test_validate_discount_fraction() {
        assert!(validate_discount_fraction(Decimal::ZERO).is_ok());
        assert!(validate_discount_fraction(Decimal::new(123456, 6)).is_ok());
        assert!(validate_discount_fraction(Decimal::ONE).is_ok());
        assert!(validate_discount_fraction(Decimal::new(10001, 4)).is_err());
        assert!(validate_discount_fraction(Decimal::new(-1, 4)).is_err());
    }

    #[test]
    fn test_validate_unit_discount_cents() {
        assert_eq!(validate_unit_discount_cents(50.0).unwrap(), 50);
        assert_eq!(validate_unit_discount_cents(0.0).unwrap(), 0);
        assert!(validate_unit_discount_cents(12.5).is_err());
        assert!(validate_unit_discount_cents(-3.0).is_err());
        assert!(validate_unit_discount_cents(f64::NAN).is_err());
        assert!(matches!(
            validate_unit_discount_cents(1e30),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_unit_discount_cents(i64::MAX as f64).is_err());
    }

    #[test]
    fn test_validate_bundle_and_minimum() {
        assert!(validate_bundle_size(1).is_ok());
        assert!(validate_bundle_size(0).is_err());
        assert!(validate_minimum_quantity(0).is_ok());
        assert!(validate_minimum_quantity(3).is_ok());
        assert!(validate_minimum_quantity(-1).is_err());
    }
}
