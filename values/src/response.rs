//! Response value types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::{DrStage, PatientInfo};

/// Concrete response types produced by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseValue {
    /// Completed analysis report.
    Analysis(Box<AnalysisReport>),

    /// Health check result.
    Health {
        /// Overall service status.
        status: HealthStatus,
        /// Whether the model registry reached the ready state.
        models_loaded: bool,
    },
}

impl ResponseValue {
    /// Create an analysis response.
    pub fn analysis(report: AnalysisReport) -> Self {
        Self::Analysis(Box::new(report))
    }

    /// Create a health response.
    pub fn health(status: HealthStatus, models_loaded: bool) -> Self {
        Self::Health {
            status,
            models_loaded,
        }
    }

    /// Access the analysis report, if this is an analysis response.
    pub fn as_analysis(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Analysis(report) => Some(report),
            _ => None,
        }
    }

    /// Access the health fields, if this is a health response.
    pub fn as_health(&self) -> Option<(HealthStatus, bool)> {
        match self {
            Self::Health {
                status,
                models_loaded,
            } => Some((*status, *models_loaded)),
            _ => None,
        }
    }
}

/// Service health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Models loaded; analysis requests are being served.
    Healthy,
    /// Models not loaded (still loading, or load failed); analysis requests
    /// are refused.
    Unhealthy,
}

/// The externally visible result of one analysis request.
///
/// Immutable after assembly, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisReport {
    /// Severity stage label, one of the five fixed names.
    pub stage: String,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// Clinical description for the detected stage.
    pub description: String,
    /// Exactly three recommendations, in priority order.
    pub recommendations: Vec<String>,
    /// Number of segmented lesion regions.
    pub lesion_count: u64,
    /// Rendered images, each a base64-wrapped lossless PNG.
    pub images: ImageArtifacts,
    /// Patient passthrough fields, echoed verbatim.
    pub patient: PatientInfo,
}

impl AnalysisReport {
    /// The severity stage parsed back from its label.
    ///
    /// Unknown labels degrade to [`DrStage::NoDr`], consistent with the
    /// knowledge-table fallback.
    pub fn dr_stage(&self) -> DrStage {
        DrStage::ALL
            .into_iter()
            .find(|s| s.label() == self.stage)
            .unwrap_or(DrStage::NoDr)
    }
}

/// The four rendered images of a report, base64-wrapped PNG.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageArtifacts {
    /// The uploaded image, re-encoded losslessly.
    pub original: String,
    /// Contrast-enhanced image.
    pub enhanced: String,
    /// Explanation heatmap.
    pub heatmap: String,
    /// Original with the lesion mask composited on top.
    pub segmentation: String,
}
