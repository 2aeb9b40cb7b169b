//! Fixed grouping of model outputs.
//!
//! | Category | Models |
//! |----------|--------|
//! | Asset-based | BPS, S-RIM (ROE maintained) |
//! | Earnings-based | EPS × historical P/E, net income × target P/E, EPS × 10, PEG |
//! | Mixed | ROE × EPS, Yamaguchi |
//! | Reference-only | S-RIM decline scenarios |

use super::types::{CategorizedModels, ModelCategory, ModelEstimate, ModelId};

impl ModelId {
    /// Category this model output always belongs to.
    pub fn category(self) -> ModelCategory {
        match self {
            Self::BookValue | Self::SrimBase => ModelCategory::AssetBased,
            Self::EpsHistoricalPer
            | Self::NetIncomeTargetPer
            | Self::EpsFixedMultiple
            | Self::Peg => ModelCategory::EarningsBased,
            Self::RoeEps | Self::Yamaguchi => ModelCategory::Mixed,
            Self::SrimDecline10 | Self::SrimDecline20 => ModelCategory::ReferenceOnly,
        }
    }
}

/// Split model outputs into their category buckets, preserving order.
pub fn categorize(estimates: &[ModelEstimate]) -> CategorizedModels {
    let mut categories = CategorizedModels::default();
    for estimate in estimates {
        let bucket = match estimate.id.category() {
            ModelCategory::AssetBased => &mut categories.asset_based,
            ModelCategory::EarningsBased => &mut categories.earnings_based,
            ModelCategory::Mixed => &mut categories.mixed,
            ModelCategory::ReferenceOnly => &mut categories.reference_only,
        };
        bucket.push(estimate.clone());
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_model_is_bucketed_once() {
        let estimates: Vec<ModelEstimate> = ModelId::ALL
            .iter()
            .map(|&id| ModelEstimate::new(id, 100.0))
            .collect();

        let categories = categorize(&estimates);
        assert_eq!(categories.asset_based.len(), 2);
        assert_eq!(categories.earnings_based.len(), 4);
        assert_eq!(categories.mixed.len(), 2);
        assert_eq!(categories.reference_only.len(), 2);
        assert_eq!(categories.statistical().len(), 8);
    }

    #[test]
    fn test_decline_scenarios_are_reference_only() {
        let categories = categorize(&[
            ModelEstimate::new(ModelId::SrimBase, 1.0),
            ModelEstimate::new(ModelId::SrimDecline10, 2.0),
            ModelEstimate::new(ModelId::SrimDecline20, 3.0),
        ]);

        assert_eq!(categories.asset_based[0].id, ModelId::SrimBase);
        let reference: Vec<ModelId> = categories.reference_only.iter().map(|m| m.id).collect();
        assert_eq!(reference, vec![ModelId::SrimDecline10, ModelId::SrimDecline20]);
        assert!(categories
            .statistical()
            .iter()
            .all(|m| m.category.is_statistical()));
    }
}
