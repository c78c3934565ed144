//! Analysis Orchestrator
//!
//! Sequences the pipeline stages per request: decode → enhance → segment →
//! classify → explain → assemble. The order is fixed with no branching; the
//! first failure aborts the remaining transitions and surfaces a single
//! error. Partial results are never returned.

use std::sync::Arc;

use fundus_pipeline::codec;
use fundus_values::{AnalysisError, AnalysisReport, AnalysisResult, PatientInfo, StageKind};

use crate::registry::ModelRegistry;

/// Per-request pipeline orchestrator.
///
/// `run` is a pure function of the registry, the input bytes, and the
/// patient info: no logging, persistence, or shared-state mutation happens
/// inside it, so it is safe to execute for any number of requests
/// concurrently over the same ready registry. Determinism follows from the
/// stage contracts: byte-identical input against the same ready registry
/// yields identical classification and segmentation output.
pub struct AnalysisOrchestrator {
    registry: Arc<ModelRegistry>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator over a shared registry.
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Run the full pipeline for one request.
    ///
    /// Readiness is checked before anything else: an unready registry yields
    /// [`AnalysisError::NotReady`] without decoding or invoking any stage.
    /// Decode failures yield [`AnalysisError::InvalidInput`], also before
    /// any stage runs. Stage errors propagate unchanged, wrapped with the
    /// failing stage's name.
    pub fn run(&self, image_bytes: &[u8], patient: PatientInfo) -> AnalysisResult<AnalysisReport> {
        let stages = self.registry.stages()?;

        let original = codec::decode(image_bytes)
            .map_err(|e| AnalysisError::invalid_input(e.to_string()))?;

        let enhanced = stages
            .enhancer
            .enhance(&original)
            .map_err(|e| AnalysisError::stage(StageKind::Enhance, e))?;

        let segmentation = stages
            .segmenter
            .segment(&enhanced)
            .map_err(|e| AnalysisError::stage(StageKind::Segment, e))?;

        let classification = stages
            .classifier
            .classify(&enhanced)
            .map_err(|e| AnalysisError::stage(StageKind::Classify, e))?;

        let heatmap = stages
            .explainer
            .explain(&enhanced, classification.stage)
            .map_err(|e| AnalysisError::stage(StageKind::Explain, e))?;

        crate::assembler::assemble(
            &original,
            &enhanced,
            &heatmap,
            &segmentation,
            classification,
            patient,
        )
    }
}
