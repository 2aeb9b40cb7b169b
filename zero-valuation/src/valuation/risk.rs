//! Earnings volatility risk profile.
//!
//! Risk score is the mean of two coefficients of variation (population
//! standard deviation over |mean|): one for EPS, one for yearly ROE.

use statrs::statistics::Statistics;

use super::config::ValuationConfig;
use super::types::{FinancialSeries, RiskLevel, RiskProfile};

/// Coefficient of variation; 0 for fewer than two points or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mean = values.iter().mean();
    if mean == 0.0 || !mean.is_finite() {
        return 0.0;
    }

    values.iter().population_std_dev() / mean.abs()
}

/// Rate EPS and ROE volatility into a three-tier risk level.
pub fn profile_risk(financials: &FinancialSeries, config: &ValuationConfig) -> RiskProfile {
    let eps_cv = coefficient_of_variation(&financials.eps_values());
    let roe_cv = coefficient_of_variation(&financials.roe_values());
    let score = (eps_cv + roe_cv) / 2.0;

    let (level, message) = if score < config.low_risk_below {
        (RiskLevel::Low, "Low risk: earnings and ROE are stable")
    } else if score < config.medium_risk_below {
        (RiskLevel::Medium, "Medium risk: earnings show moderate volatility")
    } else {
        (RiskLevel::High, "High risk: earnings are highly volatile")
    };

    RiskProfile {
        level,
        score,
        eps_cv,
        roe_cv,
        message: message.into(),
    }
}
