//! Zero Valuation Library
//!
//! Intrinsic value estimation for listed companies. Given a company's recent
//! statements and a market quote, the engine derives a fair price range from
//! several classic models and reports how far the current price sits from it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ValuationEngine                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  aggregates ──▶ models ──▶ categorize ──▶ outlier ──▶ range  │
//! │                                                    │         │
//! │  reliability · risk · trailing P/E        signal ◀─┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is a pure function of its inputs. It holds no state between
//! calls and performs no I/O.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod valuation;

pub use error::ValuationError;
pub use valuation::{ValuationConfig, ValuationEngine, ValuationInput, ValuationRequest, ValuationResult};
