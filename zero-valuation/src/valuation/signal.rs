//! Price signal: current price against the mid-range fair value.

use super::config::ValuationConfig;
use super::types::{PriceSignal, SignalBand};

/// Bucket `current_price / mid` into one of five bands.
///
/// Every boundary is exclusive on the upper side: a ratio of exactly 0.70
/// lands in the light-green band. A non-positive or non-finite fair value or
/// price gives `SignalBand::Undefined`.
pub fn classify_signal(current_price: f64, mid: f64, config: &ValuationConfig) -> PriceSignal {
    if !(mid > 0.0) || !mid.is_finite() || !(current_price > 0.0) || !current_price.is_finite() {
        return PriceSignal {
            band: SignalBand::Undefined,
            ratio: None,
            margin_of_safety: None,
            message: "Fair value unavailable; no price signal".into(),
        };
    }

    let ratio = current_price / mid;
    let (band, message) = if ratio < config.green_below {
        (SignalBand::Green, "Materially undervalued (30% or more below fair value)")
    } else if ratio < config.light_green_below {
        (SignalBand::LightGreen, "Undervalued (10-30% below fair value)")
    } else if ratio < config.yellow_below {
        (SignalBand::Yellow, "Near fair value (within ±10%)")
    } else if ratio < config.orange_below {
        (SignalBand::Orange, "Overvalued (10-30% above fair value)")
    } else {
        (SignalBand::Red, "Materially overvalued (30% or more above fair value)")
    };

    PriceSignal {
        band,
        ratio: Some(ratio),
        margin_of_safety: Some((mid - current_price) / mid * 100.0),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(price: f64, mid: f64) -> SignalBand {
        classify_signal(price, mid, &ValuationConfig::default()).band
    }

    #[test]
    fn test_bands() {
        assert_eq!(band(10_000.0, 14_500.0), SignalBand::Green);
        assert_eq!(band(80.0, 100.0), SignalBand::LightGreen);
        assert_eq!(band(100.0, 100.0), SignalBand::Yellow);
        assert_eq!(band(120.0, 100.0), SignalBand::Orange);
        assert_eq!(band(200.0, 100.0), SignalBand::Red);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(band(69.9, 100.0), SignalBand::Green);
        assert_eq!(band(70.0, 100.0), SignalBand::LightGreen);
        assert_eq!(band(90.0, 100.0), SignalBand::Yellow);
        assert_eq!(band(110.0, 100.0), SignalBand::Orange);
        assert_eq!(band(130.0, 100.0), SignalBand::Red);
    }

    #[test]
    fn test_margin_of_safety() {
        let signal = classify_signal(75.0, 100.0, &ValuationConfig::default());
        assert!((signal.ratio.unwrap() - 0.75).abs() < 1e-12);
        assert!((signal.margin_of_safety.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_fair_value_is_undefined() {
        assert_eq!(band(100.0, 0.0), SignalBand::Undefined);
        assert_eq!(band(100.0, -5.0), SignalBand::Undefined);
        assert_eq!(band(100.0, f64::NAN), SignalBand::Undefined);
        assert_eq!(band(0.0, 100.0), SignalBand::Undefined);
        let signal = classify_signal(100.0, 0.0, &ValuationConfig::default());
        assert!(signal.ratio.is_none());
    }
}
