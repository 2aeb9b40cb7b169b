//! Data reliability score (0-10).
//!
//! Starts at 10 and deducts for:
//! - fewer than three fiscal years (−3)
//! - each year without EPS (−1)
//! - any negative EPS (−2)
//! - any year-over-year EPS ratio outside the swing band (−2)

use super::config::ValuationConfig;
use super::types::{Confidence, DataReliability, FinancialSeries, RECENT_YEARS};

const MAX_SCORE: i32 = 10;

/// Score the completeness and stability of the statement history.
pub fn score_reliability(financials: &FinancialSeries, config: &ValuationConfig) -> DataReliability {
    let years = financials.recent();
    let mut score = MAX_SCORE;

    if years.len() < RECENT_YEARS {
        score -= 3;
    }

    let missing_eps = years.iter().filter(|y| y.eps.is_none()).count() as i32;
    score -= missing_eps;

    if years.iter().any(|y| y.eps.is_some_and(|eps| eps < 0.0)) {
        score -= 2;
    }

    // newest first, so each window is (newer, older)
    let has_swing = years.windows(2).any(|pair| match (pair[0].eps, pair[1].eps) {
        (Some(newer), Some(older)) if older != 0.0 => {
            let ratio = newer / older;
            ratio > config.swing_upper || ratio < config.swing_lower
        }
        _ => false,
    });
    if has_swing {
        score -= 2;
    }

    let score = score.clamp(0, MAX_SCORE) as u8;
    let (confidence, message) = if score >= config.high_confidence_score {
        (Confidence::High, "High confidence: data is complete and stable")
    } else if score >= config.moderate_confidence_score {
        (Confidence::Moderate, "Moderate confidence: review recommended")
    } else {
        (Confidence::Low, "Low confidence: interpret results with caution")
    };

    DataReliability {
        score,
        confidence,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::FiscalYear;

    fn series(eps: &[Option<f64>]) -> FinancialSeries {
        FinancialSeries {
            ticker: "TEST".into(),
            years: eps
                .iter()
                .enumerate()
                .map(|(i, &eps)| FiscalYear {
                    year: 2024 - i as i32,
                    eps,
                    ..FiscalYear::default()
                })
                .collect(),
            ..FinancialSeries::default()
        }
    }

    fn score(eps: &[Option<f64>]) -> u8 {
        score_reliability(&series(eps), &ValuationConfig::default()).score
    }

    #[test]
    fn test_clean_history_scores_ten() {
        let result = score_reliability(
            &series(&[Some(110.0), Some(100.0), Some(95.0)]),
            &ValuationConfig::default(),
        );
        assert_eq!(result.score, 10);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_short_history() {
        assert_eq!(score(&[Some(110.0), Some(100.0)]), 7);
    }

    #[test]
    fn test_missing_eps_years() {
        assert_eq!(score(&[Some(110.0), None, Some(100.0)]), 9);
        assert_eq!(score(&[None, None, None]), 7);
    }

    #[test]
    fn test_negative_and_swing() {
        // negative (-2) and 100/-50 ratio is below 0.5 (-2)
        assert_eq!(score(&[Some(100.0), Some(-50.0), Some(-40.0)]), 6);
        // 200/100 = 2.0 > 1.5
        assert_eq!(score(&[Some(200.0), Some(100.0), Some(100.0)]), 8);
        // 40/100 = 0.4 < 0.5
        assert_eq!(score(&[Some(40.0), Some(100.0), Some(100.0)]), 8);
    }

    #[test]
    fn test_confidence_tiers_for_sparse_history() {
        let result = score_reliability(&series(&[]), &ValuationConfig::default());
        assert_eq!(result.score, 7);

        let result = score_reliability(&series(&[None]), &ValuationConfig::default());
        assert_eq!(result.score, 6);
        assert_eq!(result.confidence, Confidence::Moderate);

        let worst = score_reliability(
            &series(&[Some(-500.0), None]),
            &ValuationConfig::default(),
        );
        // 10 - 3 - 1 - 2 = 4
        assert_eq!(worst.score, 4);
        assert_eq!(worst.confidence, Confidence::Low);
    }

    #[test]
    fn test_confidence_cutoffs_are_inclusive() {
        let cfg = ValuationConfig::default();
        let confidence = |eps: &[Option<f64>]| {
            let result = score_reliability(&series(eps), &cfg);
            (result.score, result.confidence)
        };

        // swing only: 10 - 2
        assert_eq!(confidence(&[Some(200.0), Some(100.0), Some(100.0)]), (8, Confidence::High));
        // short history: 10 - 3
        assert_eq!(confidence(&[Some(110.0), Some(100.0)]), (7, Confidence::Moderate));
        // short history and swing: 10 - 3 - 2
        assert_eq!(confidence(&[Some(200.0), Some(100.0)]), (5, Confidence::Moderate));
        // short history, missing EPS, negative EPS: 10 - 3 - 1 - 2
        assert_eq!(confidence(&[Some(-500.0), None]), (4, Confidence::Low));
    }
}
