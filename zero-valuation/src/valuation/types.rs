//! Valuation Engine Types.
//!
//! Inputs (statements, quotes, assumptions) and the structured result of a
//! multi-model fair value calculation.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use zero_common::AssumptionDefaults;

/// Number of fiscal years the engine looks at.
pub const RECENT_YEARS: usize = 3;

// ============================================================================
// Financial Statement Types
// ============================================================================

/// Statement figures for a single fiscal year.
///
/// A `None` field means the value was not reported. It is never read as zero
/// unless a model explicitly defaults it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Fiscal year, e.g. 2024
    pub year: i32,
    /// Earnings per share
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    /// Total equity at year end
    #[serde(default)]
    pub equity: Option<f64>,
    #[serde(default)]
    pub retained_earnings: Option<f64>,
}

impl FiscalYear {
    /// Return on equity for the year (%), when equity is positive.
    pub fn roe_pct(&self) -> Option<f64> {
        match (self.net_income, self.equity) {
            (Some(ni), Some(eq)) if eq > 0.0 => Some(ni / eq * 100.0),
            _ => None,
        }
    }

    /// Operating margin for the year (%), when revenue is positive.
    pub fn operating_margin_pct(&self) -> Option<f64> {
        match (self.operating_income, self.revenue) {
            (Some(oi), Some(rev)) if rev > 0.0 => Some(oi / rev * 100.0),
            _ => None,
        }
    }
}

/// Point-in-time figures as of the latest fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestSnapshot {
    pub total_assets: Option<f64>,
    pub equity: Option<f64>,
    /// Equity attributable to controlling shareholders
    pub equity_attributable_to_owners: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub non_current_liabilities: Option<f64>,
    pub inventories: Option<f64>,
    pub cost_of_sales: Option<f64>,
    pub trade_receivables: Option<f64>,
    pub trade_payables: Option<f64>,
    pub interest_expense: Option<f64>,
    pub investment_assets: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub gross_profit: Option<f64>,
}

impl LatestSnapshot {
    /// Owners' equity, falling back to total equity when the controlling
    /// share is not reported.
    pub fn owners_equity(&self) -> f64 {
        self.equity_attributable_to_owners
            .or(self.equity)
            .unwrap_or(0.0)
    }
}

/// Per-company statement history plus the latest balance sheet snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSeries {
    /// Symbol/ticker
    pub ticker: String,
    /// Yearly figures, newest first
    #[serde(default)]
    pub years: Vec<FiscalYear>,
    /// Figures as of the latest year
    #[serde(default)]
    pub latest: LatestSnapshot,
}

impl FinancialSeries {
    /// The most recent fiscal years, newest first.
    ///
    /// Input order is not trusted: years are re-sorted descending before the
    /// window is taken.
    pub fn recent(&self) -> Vec<&FiscalYear> {
        let mut years: Vec<&FiscalYear> = self.years.iter().collect();
        years.sort_by(|a, b| b.year.cmp(&a.year));
        years.truncate(RECENT_YEARS);
        years
    }

    /// Latest fiscal year, if any.
    pub fn latest_year(&self) -> Option<&FiscalYear> {
        self.years.iter().max_by_key(|y| y.year)
    }

    /// Latest reported EPS, defaulting to zero.
    pub fn latest_eps(&self) -> f64 {
        self.latest_year().and_then(|y| y.eps).unwrap_or(0.0)
    }

    /// Latest reported net income, defaulting to zero.
    pub fn latest_net_income(&self) -> f64 {
        self.latest_year().and_then(|y| y.net_income).unwrap_or(0.0)
    }

    /// Reported EPS values, newest first.
    pub fn eps_values(&self) -> Vec<f64> {
        self.recent().iter().filter_map(|y| y.eps).collect()
    }

    /// Reported net income values, newest first.
    pub fn net_income_values(&self) -> Vec<f64> {
        self.recent().iter().filter_map(|y| y.net_income).collect()
    }

    /// Per-year ROE (%), newest first.
    pub fn roe_values(&self) -> Vec<f64> {
        self.recent().iter().filter_map(|y| y.roe_pct()).collect()
    }

    /// Per-year operating margin (%), newest first.
    pub fn operating_margin_values(&self) -> Vec<f64> {
        self.recent()
            .iter()
            .filter_map(|y| y.operating_margin_pct())
            .collect()
    }

    /// Reported operating income values, newest first.
    pub fn operating_income_values(&self) -> Vec<f64> {
        self.recent().iter().filter_map(|y| y.operating_income).collect()
    }
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Market quote for the valued company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Symbol/ticker
    pub ticker: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Current share price
    pub price: f64,
    /// Shares outstanding
    pub shares_outstanding: f64,
    /// Closing price per fiscal year
    #[serde(default)]
    pub historical_prices: BTreeMap<i32, f64>,
}

/// Alternate current-price snapshot used only for the price signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentQuote {
    pub price: f64,
}

/// Find the quote for `ticker` (case-insensitive, surrounding whitespace ignored).
pub fn find_quote<'a>(quotes: &'a [MarketQuote], ticker: &str) -> Option<&'a MarketQuote> {
    let wanted = ticker.trim();
    quotes
        .iter()
        .find(|q| q.ticker.trim().eq_ignore_ascii_case(wanted))
}

// ============================================================================
// Assumption Types
// ============================================================================

/// User-tunable assumptions as submitted.
///
/// Each field accepts a JSON number, a numeric string, an empty string or
/// null. Anything that is not a finite number is treated as "not supplied".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAssumptions {
    #[serde(default, deserialize_with = "lenient_number")]
    pub treasury_shares: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_per: Option<f64>,
    /// Discount / required-return rate in percent
    #[serde(default, deserialize_with = "lenient_number")]
    pub discount_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub peg_ratio: Option<f64>,
}

impl UserAssumptions {
    /// Build from raw form values.
    pub fn from_raw(
        treasury_shares: Option<&str>,
        target_per: Option<&str>,
        discount_rate: Option<&str>,
        peg_ratio: Option<&str>,
    ) -> Self {
        Self {
            treasury_shares: treasury_shares.and_then(parse_number),
            target_per: target_per.and_then(parse_number),
            discount_rate: discount_rate.and_then(parse_number),
            peg_ratio: peg_ratio.and_then(parse_number),
        }
    }

    /// Fill unsupplied fields from `defaults`.
    pub fn resolve(&self, defaults: &AssumptionDefaults) -> Assumptions {
        Assumptions {
            treasury_shares: self.treasury_shares.unwrap_or(defaults.treasury_shares),
            target_per: self.target_per.unwrap_or(defaults.target_per),
            discount_rate: self.discount_rate.unwrap_or(defaults.discount_rate),
            peg_ratio: self.peg_ratio.unwrap_or(defaults.peg_ratio),
        }
    }
}

/// Assumptions after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub treasury_shares: f64,
    pub target_per: f64,
    /// Percent, e.g. 8.0
    pub discount_rate: f64,
    pub peg_ratio: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        UserAssumptions::default().resolve(&AssumptionDefaults::default())
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawNumber::Number(v)) if v.is_finite() => Some(v),
        Some(RawNumber::Text(s)) => parse_number(&s),
        _ => None,
    })
}

// ============================================================================
// Model Types
// ============================================================================

/// Identity of each valuation model output.
///
/// S-RIM reports three scenarios, so eight models yield ten outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    /// Average EPS × average historical P/E
    EpsHistoricalPer,
    /// Latest net income × target P/E, per share
    NetIncomeTargetPer,
    /// Book value per share
    BookValue,
    /// Average EPS × fixed multiple
    EpsFixedMultiple,
    /// Average ROE × average EPS
    RoeEps,
    /// Capitalized after-tax operating income plus net non-operating assets
    Yamaguchi,
    /// Residual income, ROE held
    SrimBase,
    /// Residual income, ROE down 10%
    SrimDecline10,
    /// Residual income, ROE down 20%
    SrimDecline20,
    /// Latest EPS × growth-adjusted P/E
    Peg,
}

impl ModelId {
    /// Every model output in reporting order.
    pub const ALL: [ModelId; 10] = [
        ModelId::EpsHistoricalPer,
        ModelId::NetIncomeTargetPer,
        ModelId::BookValue,
        ModelId::EpsFixedMultiple,
        ModelId::RoeEps,
        ModelId::Yamaguchi,
        ModelId::SrimBase,
        ModelId::SrimDecline10,
        ModelId::SrimDecline20,
        ModelId::Peg,
    ];

    /// Human-readable model name.
    pub fn name(self) -> &'static str {
        match self {
            Self::EpsHistoricalPer => "EPS × historical average P/E",
            Self::NetIncomeTargetPer => "Net income × target P/E",
            Self::BookValue => "Book value per share (BPS)",
            Self::EpsFixedMultiple => "EPS × 10",
            Self::RoeEps => "ROE × EPS",
            Self::Yamaguchi => "Yamaguchi operating value",
            Self::SrimBase => "S-RIM (ROE maintained)",
            Self::SrimDecline10 => "S-RIM (ROE −10%)",
            Self::SrimDecline20 => "S-RIM (ROE −20%)",
            Self::Peg => "PEG-based",
        }
    }

    /// Whether this is the protected book-value model.
    pub fn is_book_value(self) -> bool {
        matches!(self, Self::BookValue)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Grouping of model outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCategory {
    AssetBased,
    EarningsBased,
    Mixed,
    /// Reported only; never part of median, quartiles or outlier detection
    ReferenceOnly,
}

impl ModelCategory {
    /// Whether outputs in this category take part in the statistics.
    pub fn is_statistical(self) -> bool {
        !matches!(self, Self::ReferenceOnly)
    }
}

impl std::fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssetBased => write!(f, "asset-based"),
            Self::EarningsBased => write!(f, "earnings-based"),
            Self::Mixed => write!(f, "mixed"),
            Self::ReferenceOnly => write!(f, "reference-only"),
        }
    }
}

/// One model's fair price per share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEstimate {
    pub id: ModelId,
    pub name: String,
    pub category: ModelCategory,
    pub value: f64,
}

impl ModelEstimate {
    pub fn new(id: ModelId, value: f64) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            category: id.category(),
            value,
        }
    }
}

/// Model outputs grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedModels {
    pub asset_based: Vec<ModelEstimate>,
    pub earnings_based: Vec<ModelEstimate>,
    pub mixed: Vec<ModelEstimate>,
    pub reference_only: Vec<ModelEstimate>,
}

impl CategorizedModels {
    /// Outputs that feed the cross-model statistics, in category order.
    pub fn statistical(&self) -> Vec<ModelEstimate> {
        self.asset_based
            .iter()
            .chain(&self.earnings_based)
            .chain(&self.mixed)
            .cloned()
            .collect()
    }
}

/// Why a model output was excluded from the price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierReason {
    /// Value is zero, negative or not a number
    NegativeOrZero,
    /// Value is beyond the allowed band around the median
    ValueRange,
}

impl std::fmt::Display for OutlierReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeOrZero => write!(f, "negative_or_zero"),
            Self::ValueRange => write!(f, "value_range"),
        }
    }
}

/// A model output excluded as an outlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    pub id: ModelId,
    pub name: String,
    pub value: f64,
    pub reason: OutlierReason,
}

// ============================================================================
// Diagnostic Types
// ============================================================================

/// Confidence level derived from the reliability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Moderate => write!(f, "moderate"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Completeness and stability of the input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataReliability {
    /// 0-10
    pub score: u8,
    pub confidence: Confidence,
    pub message: String,
}

/// Earnings volatility tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Volatility-based risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub level: RiskLevel,
    /// Mean of the EPS and ROE coefficients of variation
    pub score: f64,
    pub eps_cv: f64,
    pub roe_cv: f64,
    pub message: String,
}

/// Low/mid/high fair price per share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    /// Number of values the quartiles were taken from
    pub sample_size: usize,
    /// True when too few normal values remained and outliers were included
    pub used_fallback: bool,
}

/// Five-band price-versus-value verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalBand {
    /// Trading at least 30% below fair value
    Green,
    /// 10-30% below fair value
    LightGreen,
    /// Within ±10% of fair value
    Yellow,
    /// 10-30% above fair value
    Orange,
    /// At least 30% above fair value
    Red,
    /// No usable fair value
    Undefined,
}

impl std::fmt::Display for SignalBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::LightGreen => write!(f, "light-green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Orange => write!(f, "orange"),
            Self::Red => write!(f, "red"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// Current price compared against the mid-range fair value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSignal {
    pub band: SignalBand,
    /// current price / mid fair value
    pub ratio: Option<f64>,
    /// (mid − price) / mid, in percent
    pub margin_of_safety: Option<f64>,
    pub message: String,
}

/// Qualitative trailing P/E status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerStatusKind {
    Negative,
    ExtremeHigh,
    VeryHigh,
    VeryLow,
    Normal,
    /// Positive EPS but no usable price
    Unavailable,
}

impl std::fmt::Display for PerStatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "negative"),
            Self::ExtremeHigh => write!(f, "extreme_high"),
            Self::VeryHigh => write!(f, "very_high"),
            Self::VeryLow => write!(f, "very_low"),
            Self::Normal => write!(f, "normal"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerStatus {
    pub status: PerStatusKind,
    pub per: Option<f64>,
    pub message: String,
}

// ============================================================================
// Result Types
// ============================================================================

/// Intermediate aggregates the models are built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationAggregates {
    pub avg_eps: f64,
    /// Mean of yearly close ÷ EPS
    pub avg_historical_per: f64,
    /// Implied growth as a fraction; ±1.0 mark turnarounds
    pub growth_rate: f64,
    /// Growth-adjusted P/E used by the PEG model
    pub peg_per: f64,
    /// Percent
    pub avg_roe: f64,
    /// Percent
    pub avg_operating_margin: f64,
    pub avg_operating_income: f64,
    /// CAGR across the reported EPS window
    pub eps_cagr: Option<f64>,
    /// current price ÷ latest EPS, when EPS is positive
    pub trailing_per: Option<f64>,
}

/// Complete output of one valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub ticker: String,
    pub name: String,
    /// Price the signal was computed against
    pub current_price: f64,
    pub assumptions: Assumptions,
    pub aggregates: ValuationAggregates,
    /// Every model output in reporting order
    pub models: Vec<ModelEstimate>,
    pub categories: CategorizedModels,
    /// Median of the positive statistical model values
    pub median: f64,
    pub outliers: Vec<Outlier>,
    pub price_range: PriceRange,
    pub signal: PriceSignal,
    pub reliability: DataReliability,
    pub risk: RiskProfile,
    pub per_status: PerStatus,
}

impl ValuationResult {
    /// Look up one model output.
    pub fn estimate(&self, id: ModelId) -> Option<&ModelEstimate> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Whether a model output was excluded as an outlier.
    pub fn is_outlier(&self, id: ModelId) -> bool {
        self.outliers.iter().any(|o| o.id == id)
    }
}

// ============================================================================
// Tests
// ============================================================================
