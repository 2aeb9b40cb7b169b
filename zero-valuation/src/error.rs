//! Errors surfaced by the valuation engine.
//!
//! Degenerate financial data never produces an error; it degrades the affected
//! model to zero instead. Only missing preconditions are reported here.

use thiserror::Error;
use zero_common::ValidationError;

/// Valuation engine error.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// No market quote exists for the requested ticker
    #[error("Market quote not found for ticker '{ticker}'")]
    QuoteNotFound { ticker: String },

    /// Engine configuration failed validation
    #[error("Invalid valuation config: {0}")]
    InvalidConfig(#[from] ValidationError),
}

impl From<ValuationError> for zero_common::Error {
    fn from(err: ValuationError) -> Self {
        match err {
            ValuationError::QuoteNotFound { .. } => Self::NotFound(err.to_string()),
            ValuationError::InvalidConfig(_) => Self::Config(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_not_found_maps_to_not_found() {
        let err = ValuationError::QuoteNotFound {
            ticker: "005930".into(),
        };
        assert_eq!(err.to_string(), "Market quote not found for ticker '005930'");
        let common: zero_common::Error = err.into();
        assert!(matches!(common, zero_common::Error::NotFound(_)));
        assert_eq!(common.exit_code(), 65);
    }

    #[test]
    fn test_invalid_config_maps_to_config_error() {
        let err = ValuationError::InvalidConfig(ValidationError::invalid(
            "outlier_band",
            "must be greater than 1.0",
        ));
        let common: zero_common::Error = err.into();
        assert!(matches!(common, zero_common::Error::Config(_)));
        assert_eq!(common.exit_code(), 78);
    }
}
