//! The valuation models.
//!
//! Each model is a [`Valuator`]: a stable [`ModelId`] plus a pure function
//! from [`ModelInputs`] to a fair price per share. [`VALUATORS`] fixes the
//! reporting order, so categorization and outlier handling iterate by id
//! instead of matching on display names.
//!
//! Missing denominators (shares, equity, discount rate) never raise: the
//! affected model reports 0 and the outlier filter excludes it.

use super::config::ValuationConfig;
use super::types::{Assumptions, FinancialSeries, MarketQuote, ModelEstimate, ModelId, ValuationAggregates};

/// Everything a model may read.
#[derive(Debug, Clone, Copy)]
pub struct ModelInputs<'a> {
    pub financials: &'a FinancialSeries,
    pub quote: &'a MarketQuote,
    pub assumptions: &'a Assumptions,
    pub aggregates: &'a ValuationAggregates,
    pub config: &'a ValuationConfig,
}

impl ModelInputs<'_> {
    fn shares(&self) -> f64 {
        self.quote.shares_outstanding
    }

    /// Discount rate as a fraction.
    fn discount(&self) -> f64 {
        self.assumptions.discount_rate / 100.0
    }
}

/// One entry of the model table.
#[derive(Clone, Copy)]
pub struct Valuator {
    pub id: ModelId,
    compute: fn(&ModelInputs<'_>) -> f64,
}

impl Valuator {
    /// Run the model. Non-finite results are reported as 0.
    pub fn evaluate(&self, inputs: &ModelInputs<'_>) -> ModelEstimate {
        let raw = (self.compute)(inputs);
        let value = if raw.is_finite() {
            raw
        } else {
            tracing::debug!(model = %self.id, raw, "Model produced a non-finite value");
            0.0
        };
        ModelEstimate::new(self.id, value)
    }
}

impl std::fmt::Debug for Valuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Valuator").field("id", &self.id).finish()
    }
}

/// The model table, in reporting order.
pub const VALUATORS: [Valuator; 10] = [
    Valuator { id: ModelId::EpsHistoricalPer, compute: eps_historical_per },
    Valuator { id: ModelId::NetIncomeTargetPer, compute: net_income_target_per },
    Valuator { id: ModelId::BookValue, compute: book_value },
    Valuator { id: ModelId::EpsFixedMultiple, compute: eps_fixed_multiple },
    Valuator { id: ModelId::RoeEps, compute: roe_eps },
    Valuator { id: ModelId::Yamaguchi, compute: yamaguchi },
    Valuator { id: ModelId::SrimBase, compute: srim_base },
    Valuator { id: ModelId::SrimDecline10, compute: srim_mild_decline },
    Valuator { id: ModelId::SrimDecline20, compute: srim_steep_decline },
    Valuator { id: ModelId::Peg, compute: peg },
];

/// Run every model in table order.
pub fn run_all(inputs: &ModelInputs<'_>) -> Vec<ModelEstimate> {
    VALUATORS.iter().map(|v| v.evaluate(inputs)).collect()
}

/// `total / shares`, or 0 when the share count is unusable.
fn per_share(total: f64, shares: f64) -> f64 {
    if shares > 0.0 && shares.is_finite() {
        total / shares
    } else {
        0.0
    }
}

fn eps_historical_per(i: &ModelInputs<'_>) -> f64 {
    i.aggregates.avg_eps * i.aggregates.avg_historical_per
}

fn net_income_target_per(i: &ModelInputs<'_>) -> f64 {
    per_share(
        i.financials.latest_net_income() * i.assumptions.target_per,
        i.shares(),
    )
}

fn book_value(i: &ModelInputs<'_>) -> f64 {
    per_share(i.financials.latest.owners_equity(), i.shares())
}

fn eps_fixed_multiple(i: &ModelInputs<'_>) -> f64 {
    i.aggregates.avg_eps * i.config.fixed_eps_multiple
}

fn roe_eps(i: &ModelInputs<'_>) -> f64 {
    // two factors kept separate: ROE as a fraction, scaled back to a multiple
    (i.aggregates.avg_roe / 100.0) * 100.0 * i.aggregates.avg_eps
}

/// Operating value (after-tax operating income capitalized at the discount
/// rate) plus net non-operating assets, less long-term debt, per share.
fn yamaguchi(i: &ModelInputs<'_>) -> f64 {
    let r = i.discount();
    if !(r > 0.0) {
        return 0.0;
    }

    let latest = &i.financials.latest;
    let operating_value = i.aggregates.avg_operating_income * (1.0 - i.config.tax_rate) / r;
    let non_operating_value = latest.current_assets.unwrap_or(0.0)
        - latest.current_liabilities.unwrap_or(0.0) * i.config.current_liability_haircut
        + latest.investment_assets.unwrap_or(0.0);

    per_share(
        operating_value + non_operating_value - latest.non_current_liabilities.unwrap_or(0.0),
        i.shares(),
    )
}

/// Residual income: `(E + E × (ROE − r) / r) / (shares − treasury)`.
fn srim(i: &ModelInputs<'_>, roe_factor: f64) -> f64 {
    let equity = i.financials.latest.owners_equity();
    let r = i.discount();
    if !(equity > 0.0) || !(r > 0.0) {
        return 0.0;
    }

    let roe = i.aggregates.avg_roe * roe_factor / 100.0;
    let value = equity + equity * (roe - r) / r;
    per_share(value, i.shares() - i.assumptions.treasury_shares)
}

fn srim_base(i: &ModelInputs<'_>) -> f64 {
    srim(i, 1.0)
}

fn srim_mild_decline(i: &ModelInputs<'_>) -> f64 {
    srim(i, i.config.srim_mild_decline)
}

fn srim_steep_decline(i: &ModelInputs<'_>) -> f64 {
    srim(i, i.config.srim_steep_decline)
}

fn peg(i: &ModelInputs<'_>) -> f64 {
    i.financials.latest_eps() * i.aggregates.peg_per
}
