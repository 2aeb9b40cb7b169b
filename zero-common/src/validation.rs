//! Configuration validation for Zero tools.
//!
//! Provides validation logic for configuration fields to ensure
//! all values are present and within valid ranges.

use thiserror::Error;

use crate::config::{AssumptionDefaults, Config, ObservabilityConfig};
use crate::logging::{LOG_FORMATS, LOG_LEVELS};

/// Configuration validation error.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Shorthand for an `InvalidValue` error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Collapse a list of errors into a single result.
    pub fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

/// Check that a number is finite and strictly positive.
pub fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ));
    }
    Ok(())
}

/// Check that a number is finite and not negative.
pub fn require_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("must be zero or greater, got {value}"),
        ));
    }
    Ok(())
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.valuation.default_assumptions.validate() {
            errors.push(e);
        }

        ValidationError::collect(errors)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::invalid(
                "observability.log_level",
                format!("must be one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::invalid(
                "observability.log_format",
                format!("must be one of {}", LOG_FORMATS.join(", ")),
            ));
        }

        Ok(())
    }
}

impl Validate for AssumptionDefaults {
    fn validate(&self) -> ValidationResult<()> {
        let errors: Vec<ValidationError> = [
            require_non_negative(
                "valuation.default_assumptions.treasury_shares",
                self.treasury_shares,
            ),
            require_positive("valuation.default_assumptions.target_per", self.target_per),
            require_positive(
                "valuation.default_assumptions.discount_rate",
                self.discount_rate,
            ),
            require_positive("valuation.default_assumptions.peg_ratio", self.peg_ratio),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        ValidationError::collect(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "observability.log_format"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = Config::default();
        config.observability.log_level = "DEBUG".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multiple_assumption_errors() {
        let mut config = Config::default();
        config.valuation.default_assumptions.discount_rate = 0.0;
        config.valuation.default_assumptions.peg_ratio = f64::NAN;
        match config.validate().unwrap_err() {
            ValidationError::Multiple(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_treasury_shares() {
        let defaults = AssumptionDefaults {
            treasury_shares: -1.0,
            ..AssumptionDefaults::default()
        };
        assert!(defaults.validate().is_err());
    }
}
