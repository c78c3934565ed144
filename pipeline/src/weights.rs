//! Stage weight loading.
//!
//! All four stage implementations are parameterized by [`StageWeights`],
//! deserialized from a TOML weights file at registry initialization. When no
//! file is configured the built-in defaults apply. An unreadable or invalid
//! file is a load error: the registry treats it as fatal and refuses traffic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 5;

/// Number of severity classes the classifier produces.
pub const CLASS_COUNT: usize = 5;

/// Parameters for all four pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageWeights {
    /// Contrast enhancement parameters.
    pub enhancer: EnhancerWeights,
    /// Lesion segmentation parameters.
    pub segmenter: SegmenterWeights,
    /// Severity classifier parameters.
    pub classifier: ClassifierWeights,
    /// Explanation heatmap parameters.
    pub explainer: ExplainerWeights,
}

impl Default for StageWeights {
    fn default() -> Self {
        Self {
            enhancer: EnhancerWeights::default(),
            segmenter: SegmenterWeights::default(),
            classifier: ClassifierWeights::default(),
            explainer: ExplainerWeights::default(),
        }
    }
}

impl StageWeights {
    /// Load and validate weights from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            PipelineError::WeightsIo {
                path: path.display().to_string(),
                source,
            }
        })?;
        let weights: StageWeights = toml::from_str(&contents)
            .map_err(|e| PipelineError::InvalidWeights(e.to_string()))?;
        weights.validate()?;
        Ok(weights)
    }

    /// Validate all sections; returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        self.enhancer.validate()?;
        self.segmenter.validate()?;
        self.classifier.validate()?;
        self.explainer.validate()
    }
}

/// Multi-scale retinex parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhancerWeights {
    /// Gaussian surround sigmas, one per retinex scale.
    pub scales: Vec<f32>,
}

impl Default for EnhancerWeights {
    fn default() -> Self {
        Self {
            scales: vec![4.0, 16.0, 36.0],
        }
    }
}

impl EnhancerWeights {
    fn validate(&self) -> Result<()> {
        if self.scales.is_empty() {
            return Err(PipelineError::InvalidWeights(
                "enhancer needs at least one scale".to_string(),
            ));
        }
        if self.scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(PipelineError::InvalidWeights(
                "enhancer scales must be finite and positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lesion segmentation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmenterWeights {
    /// Red-lesion response threshold above which a pixel is lesion.
    pub threshold: f32,
    /// Minimum connected-region area in pixels; smaller regions are noise.
    pub min_area: u32,
}

impl Default for SegmenterWeights {
    fn default() -> Self {
        Self {
            threshold: 24.0,
            min_area: 12,
        }
    }
}

impl SegmenterWeights {
    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(PipelineError::InvalidWeights(
                "segmenter threshold must be finite and positive".to_string(),
            ));
        }
        if self.min_area == 0 {
            return Err(PipelineError::InvalidWeights(
                "segmenter min_area must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Linear severity classifier parameters.
///
/// Feature order: mean luminance, luminance spread, lesion response energy,
/// lesion coverage fraction, bright fraction. Rows are severity classes in
/// ascending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierWeights {
    /// `CLASS_COUNT x FEATURE_COUNT` weight matrix.
    pub weights: [[f32; FEATURE_COUNT]; CLASS_COUNT],
    /// Per-class bias.
    pub bias: [f32; CLASS_COUNT],
    /// Response threshold used for the lesion coverage feature.
    pub coverage_threshold: f32,
}

impl Default for ClassifierWeights {
    fn default() -> Self {
        Self {
            weights: [
                [0.5, -1.0, -6.0, -8.0, -0.5],
                [0.2, 0.5, 2.0, 3.0, 0.2],
                [0.0, 1.0, 4.0, 6.0, 0.5],
                [-0.2, 1.5, 6.0, 9.0, 0.8],
                [-0.4, 2.0, 8.0, 12.0, 1.2],
            ],
            bias: [2.0, 0.8, 0.0, -0.8, -1.6],
            coverage_threshold: 24.0,
        }
    }
}

impl ClassifierWeights {
    fn validate(&self) -> Result<()> {
        let finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.bias.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(PipelineError::InvalidWeights(
                "classifier weights and bias must be finite".to_string(),
            ));
        }
        if !self.coverage_threshold.is_finite() || self.coverage_threshold <= 0.0 {
            return Err(PipelineError::InvalidWeights(
                "classifier coverage_threshold must be finite and positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Explanation heatmap parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplainerWeights {
    /// Gaussian sigma applied to the saliency field before rendering.
    pub smoothing_sigma: f32,
    /// Heatmap opacity over the source image, in `(0, 1]`.
    pub blend: f32,
}

impl Default for ExplainerWeights {
    fn default() -> Self {
        Self {
            smoothing_sigma: 6.0,
            blend: 0.55,
        }
    }
}

impl ExplainerWeights {
    fn validate(&self) -> Result<()> {
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma <= 0.0 {
            return Err(PipelineError::InvalidWeights(
                "explainer smoothing_sigma must be finite and positive".to_string(),
            ));
        }
        if !self.blend.is_finite() || self.blend <= 0.0 || self.blend > 1.0 {
            return Err(PipelineError::InvalidWeights(
                "explainer blend must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
