//! Nearest-rank quartile price range.

use super::types::PriceRange;

/// Derive low/mid/high from the normal values, falling back to every
/// statistical model value when fewer than `min_sample` normal values remain.
pub fn aggregate_range(normal: &[f64], all: &[f64], min_sample: usize) -> PriceRange {
    if normal.len() >= min_sample {
        return quartiles(normal, false);
    }

    tracing::warn!(
        normal = normal.len(),
        required = min_sample,
        "Too few normal model values, using all models for the price range"
    );
    quartiles(all, true)
}

/// Quartiles at index `floor(p × count)` of the ascending values.
fn quartiles(values: &[f64], used_fallback: bool) -> PriceRange {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let at = |p: f64| -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let idx = ((p * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
        sorted[idx]
    };

    PriceRange {
        low: at(0.25),
        mid: at(0.5),
        high: at(0.75),
        sample_size: sorted.len(),
        used_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_rank_indices() {
        // count 8: indices 2, 4, 6
        let values = [80.0, 10.0, 70.0, 20.0, 60.0, 30.0, 50.0, 40.0];
        let range = aggregate_range(&values, &values, 3);
        assert_eq!((range.low, range.mid, range.high), (30.0, 50.0, 70.0));
        assert!(!range.used_fallback);
        assert_eq!(range.sample_size, 8);
    }

    #[test]
    fn test_three_values() {
        // count 3: indices 0, 1, 2
        let range = aggregate_range(&[300.0, 100.0, 200.0], &[], 3);
        assert_eq!((range.low, range.mid, range.high), (100.0, 200.0, 300.0));
    }

    #[test]
    fn test_fallback_to_all_values() {
        let all = [-10.0, 0.0, 5.0, 100.0, 120.0];
        let range = aggregate_range(&[100.0, 120.0], &all, 3);
        assert!(range.used_fallback);
        // count 5: indices 1, 2, 3
        assert_eq!((range.low, range.mid, range.high), (0.0, 5.0, 100.0));
    }

    #[test]
    fn test_empty_fallback_is_zero() {
        let range = aggregate_range(&[], &[], 3);
        assert_eq!((range.low, range.mid, range.high), (0.0, 0.0, 0.0));
        assert_eq!(range.sample_size, 0);
    }

    #[test]
    fn test_ordering_holds_for_many_sets() {
        let sets: Vec<Vec<f64>> = vec![
            vec![1.0, 1.0, 1.0],
            vec![5.0, 4.0, 3.0, 2.0, 1.0],
            vec![1e6, 3.0, 7.5, 0.01],
            vec![42.0, 17.0, 99.0, 23.0, 8.0, 61.0, 77.0],
        ];
        for set in sets {
            let range = aggregate_range(&set, &set, 3);
            assert!(range.low <= range.mid && range.mid <= range.high, "{set:?}");
        }
    }
}
