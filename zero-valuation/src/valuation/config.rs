//! Valuation engine tunables.
//!
//! An immutable table of the constants the models, filters and classifiers
//! use. The defaults are the house constants; callers pass a modified copy to
//! `ValuationEngine::with_config` rather than mutating shared state.

use serde::{Deserialize, Serialize};
use zero_common::validation::{require_non_negative, require_positive};
use zero_common::{Validate, ValidationError, ValidationResult};

/// Valuation engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    // Averaging
    /// Divisor used when any averaged period is negative
    pub negative_period_divisor: f64,

    // Model constants
    /// Corporate tax rate applied to operating income (fraction)
    pub tax_rate: f64,
    /// Multiplier on current liabilities in the non-operating value
    pub current_liability_haircut: f64,
    /// Fixed multiple for the EPS × N model
    pub fixed_eps_multiple: f64,
    /// Historical P/E used when no year yields a valid ratio
    pub default_historical_per: f64,
    /// Growth rate used when no earnings history supports one (fraction)
    pub fallback_growth_rate: f64,
    /// Lower clamp for the PEG-derived P/E
    pub peg_per_min: f64,
    /// Upper clamp for the PEG-derived P/E
    pub peg_per_max: f64,
    /// ROE factor for the mild-decline S-RIM scenario
    pub srim_mild_decline: f64,
    /// ROE factor for the steep-decline S-RIM scenario
    pub srim_steep_decline: f64,

    // Outlier filtering
    /// Values beyond median × band or below median ÷ band are outliers
    pub outlier_band: f64,
    /// Fewer normal values than this and the range uses every model
    pub min_range_sample: usize,

    // Reliability scoring
    /// Year-over-year EPS ratio above this is a swing
    pub swing_upper: f64,
    /// Year-over-year EPS ratio below this is a swing
    pub swing_lower: f64,
    pub high_confidence_score: u8,
    pub moderate_confidence_score: u8,

    // Risk bands (coefficient of variation)
    pub low_risk_below: f64,
    pub medium_risk_below: f64,

    // Price signal bands (price ÷ fair value)
    pub green_below: f64,
    pub light_green_below: f64,
    pub yellow_below: f64,
    pub orange_below: f64,

    // Trailing P/E bands
    pub extreme_high_per: f64,
    pub very_high_per: f64,
    pub very_low_per: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            negative_period_divisor: 4.5,
            tax_rate: 0.25,
            current_liability_haircut: 1.2,
            fixed_eps_multiple: 10.0,
            default_historical_per: 10.0,
            fallback_growth_rate: 0.05,
            peg_per_min: 5.0,
            peg_per_max: 50.0,
            srim_mild_decline: 0.9,
            srim_steep_decline: 0.8,
            outlier_band: 3.0,
            min_range_sample: 3,
            swing_upper: 1.5,
            swing_lower: 0.5,
            high_confidence_score: 8,
            moderate_confidence_score: 5,
            low_risk_below: 0.3,
            medium_risk_below: 0.6,
            green_below: 0.7,
            light_green_below: 0.9,
            yellow_below: 1.1,
            orange_below: 1.3,
            extreme_high_per: 200.0,
            very_high_per: 80.0,
            very_low_per: 5.0,
        }
    }
}

fn require_ascending(fields: &[(&str, f64)]) -> ValidationResult<()> {
    for pair in fields.windows(2) {
        let ((lo_name, lo), (hi_name, hi)) = (pair[0], pair[1]);
        if !(lo < hi) {
            return Err(ValidationError::Conflict {
                reason: format!("{lo_name} ({lo}) must be below {hi_name} ({hi})"),
            });
        }
    }
    Ok(())
}

impl Validate for ValuationConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors: Vec<ValidationError> = [
            require_positive("negative_period_divisor", self.negative_period_divisor),
            require_non_negative("tax_rate", self.tax_rate),
            require_non_negative("current_liability_haircut", self.current_liability_haircut),
            require_positive("fixed_eps_multiple", self.fixed_eps_multiple),
            require_positive("default_historical_per", self.default_historical_per),
            require_positive("srim_mild_decline", self.srim_mild_decline),
            require_positive("srim_steep_decline", self.srim_steep_decline),
            require_positive("swing_lower", self.swing_lower),
            require_positive("green_below", self.green_below),
            require_ascending(&[("peg_per_min", self.peg_per_min), ("peg_per_max", self.peg_per_max)]),
            require_ascending(&[("swing_lower", self.swing_lower), ("swing_upper", self.swing_upper)]),
            require_ascending(&[
                ("low_risk_below", self.low_risk_below),
                ("medium_risk_below", self.medium_risk_below),
            ]),
            require_ascending(&[
                ("green_below", self.green_below),
                ("light_green_below", self.light_green_below),
                ("yellow_below", self.yellow_below),
                ("orange_below", self.orange_below),
            ]),
            require_ascending(&[
                ("very_low_per", self.very_low_per),
                ("very_high_per", self.very_high_per),
                ("extreme_high_per", self.extreme_high_per),
            ]),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if self.tax_rate >= 1.0 {
            errors.push(ValidationError::invalid("tax_rate", "must be below 1.0"));
        }
        if !(self.outlier_band > 1.0) {
            errors.push(ValidationError::invalid("outlier_band", "must be greater than 1.0"));
        }
        if self.min_range_sample == 0 {
            errors.push(ValidationError::invalid("min_range_sample", "must be at least 1"));
        }
        if self.moderate_confidence_score > self.high_confidence_score
            || self.high_confidence_score > 10
        {
            errors.push(ValidationError::Conflict {
                reason: "confidence scores must satisfy moderate <= high <= 10".into(),
            });
        }

        ValidationError::collect(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ValuationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unordered_signal_bands_rejected() {
        let config = ValuationConfig {
            light_green_below: 1.2,
            ..ValuationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_outlier_band_must_exceed_one() {
        let config = ValuationConfig {
            outlier_band: 1.0,
            ..ValuationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ValuationConfig =
            serde_json::from_str(r#"{ "outlier_band": 2.5 }"#).unwrap();
        assert_eq!(config.outlier_band, 2.5);
        assert_eq!(config.negative_period_divisor, 4.5);
    }
}
