//! Intermediate aggregates shared by the valuation models.

use std::collections::BTreeMap;

use super::averaging::PeriodAverager;
use super::config::ValuationConfig;
use super::growth::{estimate_growth, GrowthEstimate};
use super::per::trailing_per;
use super::types::{Assumptions, FinancialSeries, ValuationAggregates};

/// Derive every aggregate the models consume.
pub fn derive_aggregates(
    financials: &FinancialSeries,
    historical_prices: &BTreeMap<i32, f64>,
    assumptions: &Assumptions,
    current_price: f64,
    config: &ValuationConfig,
) -> ValuationAggregates {
    let averager = PeriodAverager::new(config.negative_period_divisor);

    let growth_rate = implied_growth(financials, config);
    // ±1.0 turnaround sentinels pass through; the clamp bounds them
    let peg_per = (growth_rate * 100.0 * assumptions.peg_ratio)
        .clamp(config.peg_per_min, config.peg_per_max);

    let eps_cagr = Some(estimate_growth(&financials.eps_values()))
        .filter(|g| g.is_defined())
        .map(GrowthEstimate::rate);

    ValuationAggregates {
        avg_eps: averager.average(&financials.eps_values()),
        avg_historical_per: average_historical_per(financials, historical_prices, config),
        growth_rate,
        peg_per,
        avg_roe: averager.average(&financials.roe_values()),
        avg_operating_margin: averager.average(&financials.operating_margin_values()),
        avg_operating_income: averager.average(&financials.operating_income_values()),
        eps_cagr,
        trailing_per: trailing_per(current_price, financials.latest_eps()),
    }
}

/// Mean of yearly close ÷ EPS over years with a positive price and EPS.
pub fn average_historical_per(
    financials: &FinancialSeries,
    historical_prices: &BTreeMap<i32, f64>,
    config: &ValuationConfig,
) -> f64 {
    let ratios: Vec<f64> = financials
        .recent()
        .iter()
        .filter_map(|y| {
            let eps = y.eps.filter(|e| *e > 0.0)?;
            let price = historical_prices.get(&y.year).copied().filter(|p| *p > 0.0)?;
            Some(price / eps)
        })
        .filter(|r| r.is_finite())
        .collect();

    if ratios.is_empty() {
        return config.default_historical_per;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Growth rate for the PEG model, first available of:
///
/// 1. latest single-year EPS growth (raw pair, sign logic applies)
/// 2. EPS CAGR across the raw reported window
/// 3. net income growth across the positive years only
/// 4. the configured fallback
pub fn implied_growth(financials: &FinancialSeries, config: &ValuationConfig) -> f64 {
    let recent = financials.recent();

    if let [newest, previous, ..] = recent.as_slice() {
        if let (Some(latest), Some(prior)) = (newest.eps, previous.eps) {
            let estimate = estimate_growth(&[latest, prior]);
            if estimate.is_defined() {
                return estimate.rate();
            }
        }
    }

    let eps = estimate_growth(&financials.eps_values());
    if eps.is_defined() {
        return eps.rate();
    }

    let positive_income: Vec<f64> = financials
        .net_income_values()
        .into_iter()
        .filter(|v| *v > 0.0)
        .collect();
    let income = estimate_growth(&positive_income);
    if income.is_defined() {
        return income.rate();
    }

    config.fallback_growth_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::FiscalYear;

    fn series(rows: &[(i32, Option<f64>, Option<f64>)]) -> FinancialSeries {
        FinancialSeries {
            ticker: "TEST".into(),
            years: rows
                .iter()
                .map(|&(year, eps, net_income)| FiscalYear {
                    year,
                    eps,
                    net_income,
                    ..FiscalYear::default()
                })
                .collect(),
            ..FinancialSeries::default()
        }
    }

    #[test]
    fn test_single_year_growth_preferred() {
        let s = series(&[
            (2024, Some(110.0), None),
            (2023, Some(100.0), None),
            (2022, Some(50.0), None),
        ]);
        assert!((implied_growth(&s, &ValuationConfig::default()) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_eps_cagr_when_prior_year_missing() {
        let s = series(&[
            (2024, Some(121.0), None),
            (2023, None, None),
            (2022, Some(100.0), None),
        ]);
        // two reported points form a single period
        assert!((implied_growth(&s, &ValuationConfig::default()) - 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_net_income_proxy_uses_positive_years() {
        let s = series(&[
            (2024, Some(5.0), Some(120.0)),
            (2023, None, Some(-30.0)),
            (2022, None, Some(100.0)),
        ]);
        assert!((implied_growth(&s, &ValuationConfig::default()) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_growth() {
        let s = series(&[(2024, Some(5.0), Some(120.0))]);
        assert_eq!(implied_growth(&s, &ValuationConfig::default()), 0.05);
    }

    #[test]
    fn test_turnaround_feeds_sentinel() {
        let s = series(&[(2024, Some(5.0), None), (2023, Some(-3.0), None)]);
        assert_eq!(implied_growth(&s, &ValuationConfig::default()), 1.0);
    }

    #[test]
    fn test_historical_per_average_and_default() {
        let s = series(&[
            (2024, Some(10.0), None),
            (2023, Some(-5.0), None),
            (2022, Some(20.0), None),
        ]);
        let prices: BTreeMap<i32, f64> = [(2024, 150.0), (2023, 90.0), (2022, 100.0)].into();
        let per = average_historical_per(&s, &prices, &ValuationConfig::default());
        // (15 + 5) / 2, loss year skipped
        assert!((per - 10.0).abs() < 1e-12);

        let per = average_historical_per(&s, &BTreeMap::new(), &ValuationConfig::default());
        assert_eq!(per, 10.0);
    }

    #[test]
    fn test_peg_per_is_clamped() {
        let cfg = ValuationConfig::default();
        let turnaround = series(&[(2024, Some(5.0), None), (2023, Some(-3.0), None)]);
        let agg = derive_aggregates(&turnaround, &BTreeMap::new(), &Assumptions::default(), 50.0, &cfg);
        assert_eq!(agg.peg_per, 50.0);

        let collapse = series(&[(2024, Some(-5.0), None), (2023, Some(3.0), None)]);
        let agg = derive_aggregates(&collapse, &BTreeMap::new(), &Assumptions::default(), 50.0, &cfg);
        assert_eq!(agg.peg_per, 5.0);
        assert_eq!(agg.trailing_per, None);
    }
}
