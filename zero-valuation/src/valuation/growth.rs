//! Growth rate estimation over a short, newest-first series.
//!
//! Only the two endpoints are used. Sign changes between them are reported as
//! turnaround sentinels rather than as a compound rate, so callers must check
//! [`GrowthEstimate`] (or [`is_turnaround_sentinel`]) before interpolating.

use serde::{Deserialize, Serialize};

/// Rate reported for a loss-to-profit turnaround.
pub const TURNAROUND: f64 = 1.0;

/// Rate reported for a profit-to-loss reversal.
pub const DETERIORATION: f64 = -1.0;

/// Outcome of comparing the newest and oldest value of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum GrowthEstimate {
    /// Both endpoints positive: `(latest/oldest)^(1/n) − 1`
    Compound(f64),
    /// Oldest ≤ 0, latest > 0
    Turnaround,
    /// Oldest > 0, latest ≤ 0
    Deterioration,
    /// Both negative: share of the oldest loss that was recovered
    LossNarrowing(f64),
    /// Fewer than two points, oldest exactly zero with no profit, or non-finite input
    Undefined,
}

impl GrowthEstimate {
    /// Collapse to a single fraction, using the ±1.0 sentinels for turnarounds.
    pub fn rate(self) -> f64 {
        match self {
            Self::Compound(r) | Self::LossNarrowing(r) => r,
            Self::Turnaround => TURNAROUND,
            Self::Deterioration => DETERIORATION,
            Self::Undefined => 0.0,
        }
    }

    pub fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl std::fmt::Display for GrowthEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compound(r) => write!(f, "compound {:.1}%", r * 100.0),
            Self::Turnaround => write!(f, "turnaround"),
            Self::Deterioration => write!(f, "deterioration"),
            Self::LossNarrowing(r) => write!(f, "loss narrowing {:.1}%", r * 100.0),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// Estimate growth between `values[0]` (newest) and the last value (oldest).
pub fn estimate_growth(values: &[f64]) -> GrowthEstimate {
    let (Some(&latest), Some(&oldest)) = (values.first(), values.last()) else {
        return GrowthEstimate::Undefined;
    };
    let periods = values.len() - 1;
    if periods == 0 || !latest.is_finite() || !oldest.is_finite() {
        return GrowthEstimate::Undefined;
    }

    if latest > 0.0 && oldest > 0.0 {
        GrowthEstimate::Compound((latest / oldest).powf(1.0 / periods as f64) - 1.0)
    } else if latest > 0.0 {
        GrowthEstimate::Turnaround
    } else if oldest > 0.0 {
        GrowthEstimate::Deterioration
    } else if oldest == 0.0 {
        GrowthEstimate::Undefined
    } else {
        GrowthEstimate::LossNarrowing((oldest.abs() - latest.abs()) / oldest.abs())
    }
}

/// Growth as a single fraction; see [`GrowthEstimate::rate`].
pub fn growth_rate(values: &[f64]) -> f64 {
    estimate_growth(values).rate()
}

/// Whether a rate is one of the turnaround sentinels rather than a real CAGR.
///
/// A genuine CAGR of exactly ±100% is indistinguishable here; prefer matching
/// on [`GrowthEstimate`] where the distinction matters.
pub fn is_turnaround_sentinel(rate: f64) -> bool {
    rate == TURNAROUND || rate == DETERIORATION
}
