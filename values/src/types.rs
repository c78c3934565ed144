//! Core domain types: the DR severity scale, pipeline stage names, and
//! patient passthrough data.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Diabetic-retinopathy severity stage.
///
/// The scale is fixed at exactly five entries; `index()` and `from_index()`
/// convert between the enum and the classifier's output index. Indices
/// outside `[0, 4]` fall back to [`DrStage::NoDr`] rather than failing, so a
/// defective classification can never take down response assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DrStage {
    /// No diabetic retinopathy detected.
    NoDr,
    /// Mild non-proliferative diabetic retinopathy.
    Mild,
    /// Moderate non-proliferative diabetic retinopathy.
    Moderate,
    /// Severe non-proliferative diabetic retinopathy.
    Severe,
    /// Proliferative diabetic retinopathy.
    Proliferative,
}

impl DrStage {
    /// Number of entries in the severity scale.
    pub const COUNT: usize = 5;

    /// All stages in ascending severity order.
    pub const ALL: [DrStage; Self::COUNT] = [
        DrStage::NoDr,
        DrStage::Mild,
        DrStage::Moderate,
        DrStage::Severe,
        DrStage::Proliferative,
    ];

    /// Classifier output index for this stage, in `[0, 4]`.
    pub fn index(self) -> usize {
        match self {
            DrStage::NoDr => 0,
            DrStage::Mild => 1,
            DrStage::Moderate => 2,
            DrStage::Severe => 3,
            DrStage::Proliferative => 4,
        }
    }

    /// Stage for a classifier output index.
    ///
    /// Out-of-range indices degrade to [`DrStage::NoDr`].
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(DrStage::NoDr)
    }

    /// Human-facing label, as reported to clients.
    pub fn label(self) -> &'static str {
        match self {
            DrStage::NoDr => "No DR",
            DrStage::Mild => "Mild NPDR",
            DrStage::Moderate => "Moderate NPDR",
            DrStage::Severe => "Severe NPDR",
            DrStage::Proliferative => "PDR",
        }
    }
}

impl fmt::Display for DrStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Name of a pipeline stage, used for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Contrast enhancement.
    Enhance,
    /// Lesion segmentation.
    Segment,
    /// Severity classification.
    Classify,
    /// Explanation heatmap generation.
    Explain,
}

impl StageKind {
    /// Stage name as it appears in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Enhance => "enhance",
            StageKind::Segment => "segment",
            StageKind::Classify => "classify",
            StageKind::Explain => "explain",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque patient passthrough data.
///
/// The core never validates, parses, or stores these fields; they are echoed
/// back verbatim in the analysis report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientInfo {
    /// Patient name, passthrough only.
    #[serde(default)]
    pub name: String,
    /// Patient email, passthrough only.
    #[serde(default)]
    pub email: String,
}

impl PatientInfo {
    /// Build passthrough info from optional transport fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_index_round_trips() {
        for stage in DrStage::ALL {
            assert_eq!(DrStage::from_index(stage.index()), stage);
        }
    }

    #[test]
    fn out_of_range_index_degrades_to_no_dr() {
        assert_eq!(DrStage::from_index(5), DrStage::NoDr);
        assert_eq!(DrStage::from_index(usize::MAX), DrStage::NoDr);
    }

    #[test]
    fn labels_match_the_fixed_scale() {
        let labels: Vec<_> = DrStage::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            ["No DR", "Mild NPDR", "Moderate NPDR", "Severe NPDR", "PDR"]
        );
    }

    #[test]
    fn stage_serializes_as_snake_case() {
        let json = serde_json::to_string(&DrStage::Proliferative).expect("serialize");
        assert_eq!(json, r#""proliferative""#);
    }
}
