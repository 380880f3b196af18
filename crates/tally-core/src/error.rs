//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Rule construction and pricing failures         │
//! │  └── ValidationError  - Checked-input failures                         │
//! │                                                                         │
//! │  tally-rules errors (separate crate)                                   │
//! │  └── RulesError       - Config file and rule table failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → RulesError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unknown discount type is not an error anywhere in this hierarchy.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A discount rule was given a bundle size below 1.
    #[error("Discount rule '{rule}' has invalid bundle size {bundle_size}: must be at least 1")]
    InvalidBundleSize { rule: String, bundle_size: i64 },

    /// The discount resolver failed, so no line item was priced.
    ///
    /// ## When This Occurs
    /// - A resolver backed by a database or service could not answer
    ///
    /// The engine never retries; retry policy belongs to the resolver.
    #[error("Discount resolution failed: {reason}")]
    DiscountResolution { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Builds a [`CoreError::DiscountResolution`] from anything printable.
    pub fn resolution(reason: impl std::fmt::Display) -> Self {
        CoreError::DiscountResolution {
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for the checked cart operations.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not finite, or not whole where whole cents are required.
    #[error("{field} is not a valid amount: {value}")]
    InvalidDecimal { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidBundleSize {
            rule: "Green tea BOGOF".to_string(),
            bundle_size: 0,
        };
        assert_eq!(
            err.to_string(),
            "Discount rule 'Green tea BOGOF' has invalid bundle size 0: must be at least 1"
        );

        let err = CoreError::resolution("connection reset");
        assert_eq!(err.to_string(), "Discount resolution failed: connection reset");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "discount must be between 0 and 10000");

        let err = ValidationError::InvalidDecimal {
            field: "discount".to_string(),
            value: "12.5".to_string(),
        };
        assert_eq!(err.to_string(), "discount is not a valid amount: 12.5");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
