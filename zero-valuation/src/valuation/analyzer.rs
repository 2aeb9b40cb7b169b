//! Valuation Engine.
//!
//! Runs every model over one company's statements and reconciles the results:
//!
//! ```text
//! statements ─┬─ aggregates ─ models ─ categorize ─ outliers ─ range ─ signal
//!             ├─ reliability
//!             ├─ risk
//!             └─ trailing P/E status
//! ```

use std::collections::BTreeMap;

use zero_common::{AssumptionDefaults, Validate, ValuationSettings};

use super::aggregates::derive_aggregates;
use super::categorize::categorize;
use super::config::ValuationConfig;
use super::models::{run_all, ModelInputs};
use super::outlier::OutlierFilter;
use super::per::analyze_per;
use super::range::aggregate_range;
use super::reliability::score_reliability;
use super::risk::profile_risk;
use super::signal::classify_signal;
use super::types::*;
use crate::error::ValuationError;

/// Borrowed inputs for one valuation.
#[derive(Debug, Clone, Copy)]
pub struct ValuationInput<'a> {
    pub financials: &'a FinancialSeries,
    /// The company's quote; `None` fails the precondition check
    pub quote: Option<&'a MarketQuote>,
    /// Closing price per year, overriding the quote's own table
    pub historical_prices: Option<&'a BTreeMap<i32, f64>>,
    pub assumptions: UserAssumptions,
    /// Alternate price for the signal and trailing P/E
    pub current_quote: Option<&'a CurrentQuote>,
}

impl<'a> ValuationInput<'a> {
    pub fn new(financials: &'a FinancialSeries, quote: Option<&'a MarketQuote>) -> Self {
        Self {
            financials,
            quote,
            historical_prices: None,
            assumptions: UserAssumptions::default(),
            current_quote: None,
        }
    }

    pub fn with_historical_prices(mut self, prices: &'a BTreeMap<i32, f64>) -> Self {
        self.historical_prices = Some(prices);
        self
    }

    pub fn with_assumptions(mut self, assumptions: UserAssumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    pub fn with_current_quote(mut self, current: &'a CurrentQuote) -> Self {
        self.current_quote = Some(current);
        self
    }
}

/// Multi-model valuation engine.
///
/// Holds only immutable configuration, so one engine can serve any number of
/// callers.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    config: ValuationConfig,
    defaults: AssumptionDefaults,
}

impl ValuationEngine {
    /// Create an engine with default config and assumption defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config, rejecting inconsistent tables.
    pub fn with_config(config: ValuationConfig) -> Result<Self, ValuationError> {
        config.validate()?;
        Ok(Self {
            config,
            defaults: AssumptionDefaults::default(),
        })
    }

    /// Create from the shared configuration's valuation section.
    pub fn from_settings(settings: &ValuationSettings) -> Self {
        Self::new().with_defaults(settings.default_assumptions)
    }

    /// Replace the fallback values for unsupplied assumptions.
    pub fn with_defaults(mut self, defaults: AssumptionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Run every model and the diagnostics for one company.
    pub fn calculate_all_prices(
        &self,
        input: &ValuationInput<'_>,
    ) -> Result<ValuationResult, ValuationError> {
        let financials = input.financials;
        let quote = input.quote.ok_or_else(|| ValuationError::QuoteNotFound {
            ticker: financials.ticker.clone(),
        })?;

        let assumptions = input.assumptions.resolve(&self.defaults);
        let current_price = input
            .current_quote
            .map(|c| c.price)
            .filter(|p| *p > 0.0 && p.is_finite())
            .unwrap_or(quote.price);

        let mut historical_prices = quote.historical_prices.clone();
        if let Some(overrides) = input.historical_prices {
            historical_prices.extend(overrides.iter().map(|(y, p)| (*y, *p)));
        }

        let aggregates = derive_aggregates(
            financials,
            &historical_prices,
            &assumptions,
            current_price,
            &self.config,
        );
        tracing::debug!(
            ticker = %financials.ticker,
            avg_eps = aggregates.avg_eps,
            avg_historical_per = aggregates.avg_historical_per,
            growth_rate = aggregates.growth_rate,
            peg_per = aggregates.peg_per,
            avg_roe = aggregates.avg_roe,
            "Derived valuation aggregates"
        );

        let models = run_all(&ModelInputs {
            financials,
            quote,
            assumptions: &assumptions,
            aggregates: &aggregates,
            config: &self.config,
        });

        let categories = categorize(&models);
        let statistical = categories.statistical();
        let report = OutlierFilter::new(self.config.outlier_band).filter(&statistical);

        let all_values: Vec<f64> = statistical.iter().map(|m| m.value).collect();
        let price_range = aggregate_range(
            &report.normal_values(),
            &all_values,
            self.config.min_range_sample,
        );

        let signal = classify_signal(current_price, price_range.mid, &self.config);
        let per_status = analyze_per(
            aggregates.trailing_per,
            financials.latest_eps(),
            &self.config,
        );
        let reliability = score_reliability(financials, &self.config);
        let risk = profile_risk(financials, &self.config);

        tracing::info!(
            ticker = %financials.ticker,
            low = price_range.low,
            mid = price_range.mid,
            high = price_range.high,
            outliers = report.outliers.len(),
            signal = %signal.band,
            reliability = reliability.score,
            risk = %risk.level,
            "Valuation complete"
        );

        Ok(ValuationResult {
            ticker: financials.ticker.clone(),
            name: quote.name.clone(),
            current_price,
            assumptions,
            aggregates,
            models,
            categories,
            median: report.median,
            outliers: report.outliers,
            price_range,
            signal,
            reliability,
            risk,
            per_status,
        })
    }
}
