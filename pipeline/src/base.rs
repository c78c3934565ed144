//! Stage capability traits and their output types.
//!
//! The orchestrator depends only on these traits; the concrete algorithms
//! behind them are collaborators it never inspects. Implementations must be
//! deterministic and safe for concurrent `&self` use: instances are shared
//! read-only across all in-flight requests once the registry is ready.

use image::{GrayImage, RgbImage};

use fundus_values::DrStage;

use crate::error::Result;

/// Contrast enhancement: `enhance(image) -> image`.
///
/// The output must have the same dimensions as the input.
pub trait Enhance: Send + Sync {
    /// Produce a contrast-normalized copy of the image.
    fn enhance(&self, image: &RgbImage) -> Result<RgbImage>;
}

/// Lesion segmentation: `segment(image) -> {mask, lesion count, regions}`.
pub trait Segment: Send + Sync {
    /// Segment lesions in the image.
    fn segment(&self, image: &RgbImage) -> Result<SegmentationOutput>;
}

/// Severity classification: `classify(image) -> {stage, confidence}`.
pub trait Classify: Send + Sync {
    /// Classify the severity stage of the image.
    fn classify(&self, image: &RgbImage) -> Result<Classification>;
}

/// Explanation: `explain(image, stage) -> heatmap image`.
pub trait Explain: Send + Sync {
    /// Render a visual explanation heatmap for the predicted stage.
    ///
    /// The output must have the same dimensions as the input.
    fn explain(&self, image: &RgbImage, stage: DrStage) -> Result<RgbImage>;
}

/// Result of the segmentation stage.
#[derive(Debug, Clone)]
pub struct SegmentationOutput {
    /// Binary lesion mask (0 background, 255 lesion). Invariant: dimensions
    /// equal those of the image it was computed from.
    pub mask: GrayImage,
    /// Number of distinct lesion regions after area filtering.
    pub lesion_count: usize,
    /// Outer contour boundary of each lesion region.
    pub regions: Vec<Vec<(u32, u32)>>,
}

impl SegmentationOutput {
    /// An empty segmentation for an image of the given dimensions.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::new(width, height),
            lesion_count: 0,
            regions: Vec::new(),
        }
    }
}

/// Result of the classification stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Predicted severity stage; its index is in `[0, 4]` by construction.
    pub stage: DrStage,
    /// Probability of the predicted stage, in `[0, 1]`.
    pub confidence: f32,
}
