//! # Rules Error Types
//!
//! Error types for rule tables and cart configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rules Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────┐  ┌─────────────────────┐ │
//! │  │   Configuration     │  │   Rule Table    │  │      Core           │ │
//! │  │                     │  │                 │  │                     │ │
//! │  │  InvalidConfig      │  │  InvalidRule    │  │  CoreError          │ │
//! │  │  ConfigLoadFailed   │  │                 │  │  (pricing failures) │ │
//! │  │  ConfigSaveFailed   │  │                 │  │                     │ │
//! │  └─────────────────────┘  └─────────────────┘  └─────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::CoreError;
use thiserror::Error;

/// Result type alias for rule and config operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Errors raised while loading config or building rule tables.
#[derive(Debug, Error)]
pub enum RulesError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Config is well-formed but not acceptable (e.g. unknown resolver name).
    #[error("Invalid checkout configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse a config file. Unknown keys land here.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write a config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Rule Table Errors
    // =========================================================================
    /// A declared discount cannot become a rule.
    #[error("Invalid discount '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    // =========================================================================
    // Core Errors
    // =========================================================================
    /// Error from the pricing engine.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<std::io::Error> for RulesError {
    fn from(err: std::io::Error) -> Self {
        RulesError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RulesError {
    fn from(err: toml::de::Error) -> Self {
        RulesError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RulesError {
    fn from(err: toml::ser::Error) -> Self {
        RulesError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for RulesError {
    fn from(err: serde_json::Error) -> Self {
        RulesError::ConfigLoadFailed(err.to_string())
    }
}

impl RulesError {
    /// Returns true if this error comes from the config file or its values
    /// rather than from pricing.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RulesError::InvalidConfig(_)
                | RulesError::ConfigLoadFailed(_)
                | RulesError::ConfigSaveFailed(_)
                | RulesError::InvalidRule { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RulesError::InvalidRule {
            rule: "Coffee bulk".into(),
            reason: "discount must be between 0 and 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid discount 'Coffee bulk': discount must be between 0 and 1"
        );
    }

    #[test]
    fn test_core_errors_are_transparent() {
        let err: RulesError = CoreError::resolution("offline").into();
        assert_eq!(err.to_string(), "Discount resolution failed: offline");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_errors() {
        assert!(RulesError::InvalidConfig("bad".into()).is_config_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(RulesError::from(io).is_config_error());
    }
}
