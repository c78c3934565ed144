//! Severity classification stage.

use image::RgbImage;
use ndarray::{arr2, Array1, Array2};

use fundus_values::DrStage;

use crate::base::{Classification, Classify};
use crate::error::{PipelineError, Result};
use crate::response::{luminance, red_lesion_response};
use crate::weights::ClassifierWeights;

/// Linear severity classifier.
///
/// Summarizes the enhanced image into a fixed feature vector, applies a
/// class-by-feature linear model, and converts the logits to probabilities
/// with a softmax. The argmax becomes the predicted stage; its probability
/// becomes the confidence.
pub struct SeverityClassifier {
    weights: Array2<f32>,
    bias: Array1<f32>,
    coverage_threshold: f32,
}

impl SeverityClassifier {
    /// Build a classifier from validated weights.
    pub fn new(weights: &ClassifierWeights) -> Self {
        Self {
            weights: arr2(&weights.weights),
            bias: Array1::from_iter(weights.bias),
            coverage_threshold: weights.coverage_threshold,
        }
    }

    /// Image summary features, each normalized to roughly `[0, 1]`.
    fn features(&self, image: &RgbImage) -> Array1<f32> {
        let pixel_count = (image.width() * image.height()) as f32;

        let mut sum = 0.0f32;
        let mut sum_sq = 0.0f32;
        let mut bright = 0u32;
        for pixel in image.pixels() {
            let lum = luminance(pixel.0);
            sum += lum;
            sum_sq += lum * lum;
            if lum > 200.0 {
                bright += 1;
            }
        }
        let mean = sum / pixel_count;
        let variance = (sum_sq / pixel_count - mean * mean).max(0.0);

        let response = red_lesion_response(image);
        let mut response_sum = 0.0f32;
        let mut covered = 0u32;
        for pixel in response.pixels() {
            response_sum += pixel[0];
            if pixel[0] >= self.coverage_threshold {
                covered += 1;
            }
        }

        Array1::from_vec(vec![
            mean / 255.0,
            variance.sqrt() / 128.0,
            response_sum / (pixel_count * 255.0),
            covered as f32 / pixel_count,
            bright as f32 / pixel_count,
        ])
    }
}

impl Classify for SeverityClassifier {
    fn classify(&self, image: &RgbImage) -> Result<Classification> {
        let features = self.features(image);
        let logits = self.weights.dot(&features) + &self.bias;

        // Max-subtracted softmax for numeric stability.
        let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp: Array1<f32> = logits.mapv(|z| (z - max_logit).exp());
        let total = exp.sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(PipelineError::Inference(
                "classifier produced degenerate probabilities".to_string(),
            ));
        }
        let probabilities = exp / total;

        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap_or((0, 0.0));

        Ok(Classification {
            stage: DrStage::from_index(index),
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}
