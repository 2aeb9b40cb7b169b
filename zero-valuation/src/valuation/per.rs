//! Trailing P/E classification.

use super::config::ValuationConfig;
use super::types::{PerStatus, PerStatusKind};

/// Trailing P/E, defined only for a positive price and positive EPS.
pub fn trailing_per(price: f64, eps: f64) -> Option<f64> {
    (eps > 0.0 && price > 0.0 && price.is_finite()).then(|| price / eps)
}

/// Classify a trailing P/E and the EPS it came from.
pub fn analyze_per(per: Option<f64>, eps: f64, config: &ValuationConfig) -> PerStatus {
    if !(eps > 0.0) {
        return PerStatus {
            status: PerStatusKind::Negative,
            per: None,
            message: "Loss-making; P/E undefined".into(),
        };
    }
    let Some(per) = per.filter(|p| *p > 0.0 && p.is_finite()) else {
        return PerStatus {
            status: PerStatusKind::Unavailable,
            per: None,
            message: "No usable market price; P/E not computed".into(),
        };
    };

    let (status, message) = if per > config.extreme_high_per {
        (PerStatusKind::ExtremeHigh, "Extremely high P/E; earnings barely support the price")
    } else if per > config.very_high_per {
        (PerStatusKind::VeryHigh, "Very high P/E; priced for strong growth")
    } else if per < config.very_low_per {
        (PerStatusKind::VeryLow, "Very low P/E; check for one-off gains or a value trap")
    } else {
        (PerStatusKind::Normal, "P/E within the normal range")
    };

    PerStatus {
        status,
        per: Some(per),
        message: message.into(),
    }
}
