//! JSON request document accepted by the command-line runner.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use zero_common::{Result, ResultExt};

use super::analyzer::ValuationInput;
use super::types::{find_quote, CurrentQuote, FinancialSeries, MarketQuote, UserAssumptions};

/// One valuation request.
///
/// ```json
/// {
///   "financials": { "ticker": "005930", "years": [...], "latest": {...} },
///   "quotes": [{ "ticker": "005930", "price": 71000, "shares_outstanding": 5969782550 }],
///   "assumptions": { "target_per": "12", "discount_rate": 9 }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationRequest {
    pub financials: FinancialSeries,
    /// Market table; the entry matching `financials.ticker` is used
    pub quotes: Vec<MarketQuote>,
    pub historical_prices: Option<BTreeMap<i32, f64>>,
    pub assumptions: UserAssumptions,
    pub current_quote: Option<CurrentQuote>,
}

impl ValuationRequest {
    /// Read a request from a JSON file.
    ///
    /// An unreadable file is an I/O error and malformed content a JSON error,
    /// each wrapped with the path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read request: {}", path.display()))?;
        serde_json::from_str(&content).context(format!("Failed to parse request: {}", path.display()))
    }

    /// Borrow the request as engine input.
    pub fn input(&self) -> ValuationInput<'_> {
        let quote = find_quote(&self.quotes, &self.financials.ticker);
        let mut input =
            ValuationInput::new(&self.financials, quote).with_assumptions(self.assumptions);
        if let Some(prices) = &self.historical_prices {
            input = input.with_historical_prices(prices);
        }
        if let Some(current) = &self.current_quote {
            input = input.with_current_quote(current);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REQUEST: &str = r#"{
        "financials": {
            "ticker": "abc",
            "years": [{ "year": 2024, "eps": 100, "net_income": 1000 }]
        },
        "quotes": [
            { "ticker": "XYZ", "price": 1, "shares_outstanding": 1 },
            { "ticker": "ABC", "name": "Abc Ltd", "price": 1500, "shares_outstanding": 10 }
        ],
        "assumptions": { "target_per": "12", "discount_rate": "", "peg_ratio": null },
        "current_quote": { "price": 1400 }
    }"#;

    #[test]
    fn test_input_selects_matching_quote() {
        let request: ValuationRequest = serde_json::from_str(REQUEST).unwrap();
        let input = request.input();

        assert_eq!(input.quote.map(|q| q.name.as_str()), Some("Abc Ltd"));
        assert_eq!(input.assumptions.target_per, Some(12.0));
        assert_eq!(input.assumptions.discount_rate, None);
        assert_eq!(input.current_quote.map(|c| c.price), Some(1400.0));
        assert!(input.historical_prices.is_none());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REQUEST.as_bytes()).unwrap();

        let request = ValuationRequest::from_path(file.path()).unwrap();
        assert_eq!(request.financials.ticker, "abc");
        assert_eq!(request.quotes.len(), 2);
    }

    #[test]
    fn test_from_path_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = ValuationRequest::from_path(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse request"));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValuationRequest::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read request"));
        assert_eq!(err.exit_code(), 74);
    }
}
