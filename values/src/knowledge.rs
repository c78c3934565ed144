//! Clinical knowledge table.
//!
//! Static, total mapping from severity stage index to a description and an
//! ordered list of clinical recommendations. Pure lookup, no state.

use crate::types::DrStage;

/// Description and recommendations for one severity stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageGuidance {
    /// Clinical description of the findings at this stage.
    pub description: &'static str,
    /// Exactly three recommendations, in priority order.
    pub recommendations: [&'static str; 3],
}

/// Guidance entries indexed by [`DrStage::index`].
const GUIDANCE: [StageGuidance; DrStage::COUNT] = [
    StageGuidance {
        description: "No signs of diabetic retinopathy detected. Retina appears healthy.",
        recommendations: [
            "Maintain good glycemic control (HbA1c < 7%)",
            "Annual diabetic eye screening recommended",
            "Continue regular health checkups",
        ],
    },
    StageGuidance {
        description: "Microaneurysms present indicating early non-proliferative diabetic retinopathy.",
        recommendations: [
            "Optimize blood glucose management",
            "Follow-up in 6-12 months",
            "Monitor blood pressure and cholesterol",
        ],
    },
    StageGuidance {
        description: "Multiple microaneurysms, hemorrhages, and exudates detected.",
        recommendations: [
            "Refer to ophthalmologist",
            "Consider optical coherence tomography",
            "Follow-up in 3-6 months",
        ],
    },
    StageGuidance {
        description: "Severe non-proliferative stage with venous beading and intraretinal microvascular abnormalities.",
        recommendations: [
            "Urgent ophthalmology referral",
            "High risk of progression to PDR",
            "Consider early intervention",
        ],
    },
    StageGuidance {
        description: "Proliferative diabetic retinopathy with neovascularization detected.",
        recommendations: [
            "Immediate specialist care required",
            "Pan-retinal photocoagulation likely needed",
            "Regular monitoring every 1-2 months",
        ],
    },
];

/// Look up guidance by stage index.
///
/// Total over all inputs: indices outside `[0, 4]` return the "No DR" entry
/// so a broken upstream index can never fail response assembly.
pub fn lookup(index: usize) -> &'static StageGuidance {
    GUIDANCE.get(index).unwrap_or(&GUIDANCE[0])
}

/// Look up guidance for a stage directly.
pub fn for_stage(stage: DrStage) -> &'static StageGuidance {
    lookup(stage.index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_description_and_three_recommendations() {
        for i in 0..DrStage::COUNT {
            let guidance = lookup(i);
            assert!(!guidance.description.is_empty());
            assert_eq!(guidance.recommendations.len(), 3);
            assert!(guidance.recommendations.iter().all(|r| !r.is_empty()));
        }
    }

    #[test]
    fn out_of_range_lookup_matches_lookup_zero() {
        assert_eq!(lookup(5), lookup(0));
        assert_eq!(lookup(usize::MAX), lookup(0));
    }

    #[test]
    fn healthy_stage_mentions_no_retinopathy() {
        assert!(for_stage(DrStage::NoDr)
            .description
            .contains("No signs of diabetic retinopathy"));
    }
}
