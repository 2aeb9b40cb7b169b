//! Negative-aware period averaging.
//!
//! Negative periods count as zero, and if any period was negative the clamped
//! sum is divided by a fixed divisor (4.5 by default) instead of the period
//! count. A single loss year therefore drags the average down further than a
//! plain zero substitution would.

/// Averages up to three period values with the negative-period penalty.
#[derive(Debug, Clone, Copy)]
pub struct PeriodAverager {
    negative_divisor: f64,
}

impl PeriodAverager {
    pub fn new(negative_divisor: f64) -> Self {
        Self { negative_divisor }
    }

    /// Average `values`, ignoring non-finite entries.
    ///
    /// - any negative: `sum(max(v, 0)) / negative_divisor`
    /// - otherwise: `sum / count(v != 0)`, or `sum / 1` when every value is zero
    pub fn average(&self, values: &[f64]) -> f64 {
        let finite = values.iter().copied().filter(|v| v.is_finite());

        let mut sum = 0.0;
        let mut non_zero = 0usize;
        let mut any_negative = false;
        for v in finite {
            if v < 0.0 {
                any_negative = true;
            } else if v > 0.0 {
                sum += v;
                non_zero += 1;
            }
        }

        if any_negative {
            sum / self.negative_divisor
        } else {
            sum / non_zero.max(1) as f64
        }
    }
}

impl Default for PeriodAverager {
    fn default() -> Self {
        Self::new(4.5)
    }
}
