//! Multi-model fair value estimation.
//!
//! Eight valuation models (ten outputs, S-RIM reports three scenarios) are
//! run over three years of statements. The outputs are grouped by category,
//! filtered against the cross-model median and reduced to a quartile price
//! range, which is then compared with the current price.
//!
//! # Usage
//!
//! ```ignore
//! use zero_valuation::valuation::{ValuationEngine, ValuationInput};
//!
//! let engine = ValuationEngine::new();
//! let input = ValuationInput::new(&financials, Some(&quote));
//! let result = engine.calculate_all_prices(&input)?;
//!
//! println!("Fair value: {:.0} ({})", result.price_range.mid, result.signal.band);
//! ```

pub mod aggregates;
pub mod analyzer;
pub mod averaging;
pub mod categorize;
pub mod config;
pub mod growth;
pub mod models;
pub mod outlier;
pub mod per;
pub mod range;
pub mod reliability;
pub mod request;
pub mod risk;
pub mod signal;
pub mod types;

pub use analyzer::{ValuationEngine, ValuationInput};
pub use config::ValuationConfig;
pub use growth::{estimate_growth, growth_rate, GrowthEstimate};
pub use request::ValuationRequest;
pub use types::*;
