//! Outlier detection against the cross-model median.
//!
//! A value is an outlier when it is not positive, or when it sits more than
//! `band` times above or below the median of the positive values. The
//! book-value model is exempt from the band check: a positive BPS is always
//! kept as a floor.

use super::types::{ModelEstimate, Outlier, OutlierReason};

/// Partition of model outputs into normal values and outliers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlierReport {
    /// Median of the strictly positive input values (0 when there are none)
    pub median: f64,
    pub normal: Vec<ModelEstimate>,
    pub outliers: Vec<Outlier>,
}

impl OutlierReport {
    pub fn normal_values(&self) -> Vec<f64> {
        self.normal.iter().map(|m| m.value).collect()
    }
}

/// Median-band outlier filter.
#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    band: f64,
}

impl OutlierFilter {
    pub fn new(band: f64) -> Self {
        Self { band }
    }

    /// Classify every statistical estimate; reference-only outputs are skipped.
    pub fn filter(&self, estimates: &[ModelEstimate]) -> OutlierReport {
        let statistical: Vec<&ModelEstimate> = estimates
            .iter()
            .filter(|m| m.category.is_statistical())
            .collect();

        let positives: Vec<f64> = statistical
            .iter()
            .map(|m| m.value)
            .filter(|v| *v > 0.0 && v.is_finite())
            .collect();
        let median = median(&positives);

        let mut report = OutlierReport {
            median,
            ..OutlierReport::default()
        };

        for estimate in statistical {
            match self.classify(estimate, median) {
                None => report.normal.push(estimate.clone()),
                Some(reason) => {
                    tracing::debug!(
                        model = %estimate.id,
                        value = estimate.value,
                        median,
                        reason = %reason,
                        "Excluding model output"
                    );
                    report.outliers.push(Outlier {
                        id: estimate.id,
                        name: estimate.name.clone(),
                        value: estimate.value,
                        reason,
                    });
                }
            }
        }

        report
    }

    fn classify(&self, estimate: &ModelEstimate, median: f64) -> Option<OutlierReason> {
        let value = estimate.value;
        // NaN fails `> 0.0` as well
        if !(value > 0.0) || !value.is_finite() {
            return Some(OutlierReason::NegativeOrZero);
        }
        if estimate.id.is_book_value() {
            return None;
        }
        if value > median * self.band || value < median / self.band {
            return Some(OutlierReason::ValueRange);
        }
        None
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(3.0)
    }
}

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::ModelId;

    fn estimates(values: &[(ModelId, f64)]) -> Vec<ModelEstimate> {
        values
            .iter()
            .map(|&(id, v)| ModelEstimate::new(id, v))
            .collect()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_range_and_sign_outliers() {
        let report = OutlierFilter::default().filter(&estimates(&[
            (ModelId::EpsHistoricalPer, 100.0),
            (ModelId::NetIncomeTargetPer, 110.0),
            (ModelId::EpsFixedMultiple, 90.0),
            (ModelId::RoeEps, 400.0),
            (ModelId::Yamaguchi, 20.0),
            (ModelId::Peg, -5.0),
            (ModelId::SrimBase, 0.0),
        ]));

        // positives: 20, 90, 100, 110, 400 -> median 100
        assert_eq!(report.median, 100.0);
        let reasons: Vec<(ModelId, OutlierReason)> =
            report.outliers.iter().map(|o| (o.id, o.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (ModelId::RoeEps, OutlierReason::ValueRange),
                (ModelId::Yamaguchi, OutlierReason::ValueRange),
                (ModelId::Peg, OutlierReason::NegativeOrZero),
                (ModelId::SrimBase, OutlierReason::NegativeOrZero),
            ]
        );
        assert_eq!(report.normal_values(), vec![100.0, 110.0, 90.0]);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let report = OutlierFilter::default().filter(&estimates(&[
            (ModelId::EpsHistoricalPer, 100.0),
            (ModelId::NetIncomeTargetPer, 300.0),
            (ModelId::EpsFixedMultiple, 100.0),
        ]));
        // median 100: exactly 3x stays normal
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn test_book_value_exempt_from_range_rule() {
        let report = OutlierFilter::default().filter(&estimates(&[
            (ModelId::BookValue, 1.0),
            (ModelId::EpsHistoricalPer, 1000.0),
            (ModelId::NetIncomeTargetPer, 990.0),
            (ModelId::EpsFixedMultiple, 1010.0),
            (ModelId::Peg, 1005.0),
        ]));

        assert!(report.normal.iter().any(|m| m.id == ModelId::BookValue));
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn test_non_positive_book_value_is_still_outlier() {
        let report = OutlierFilter::default().filter(&estimates(&[
            (ModelId::BookValue, -10.0),
            (ModelId::EpsHistoricalPer, 100.0),
        ]));
        assert_eq!(report.outliers.len(), 1);
        assert_eq!(report.outliers[0].reason, OutlierReason::NegativeOrZero);
    }

    #[test]
    fn test_nan_is_negative_or_zero() {
        let report = OutlierFilter::default().filter(&estimates(&[
            (ModelId::Yamaguchi, f64::NAN),
            (ModelId::EpsHistoricalPer, 100.0),
        ]));
        assert_eq!(report.median, 100.0);
        assert_eq!(report.outliers[0].id, ModelId::Yamaguchi);
        assert_eq!(report.outliers[0].reason, OutlierReason::NegativeOrZero);
    }

    #[test]
    fn test_reference_only_never_enters() {
        let report = OutlierFilter::default().filter(&estimates(&[
            (ModelId::SrimDecline10, -50.0),
            (ModelId::SrimDecline20, 1e9),
            (ModelId::EpsHistoricalPer, 100.0),
        ]));
        assert_eq!(report.median, 100.0);
        assert!(report.outliers.is_empty());
        assert_eq!(report.normal.len(), 1);
    }
}
