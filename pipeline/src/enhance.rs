//! Contrast enhancement stage: multi-scale retinex.

use image::RgbImage;
use imageproc::filter::gaussian_blur_f32;

use crate::base::Enhance;
use crate::error::{PipelineError, Result};
use crate::weights::EnhancerWeights;

/// Multi-scale retinex contrast enhancer.
///
/// For each scale, the log-domain difference between a pixel and its
/// gaussian-blurred surround is accumulated with equal scale weights; the
/// accumulated response is then range-stretched back to `[0, 255]`. A
/// degenerate response range (uniform input) leaves the image unchanged.
pub struct RetinexEnhancer {
    scales: Vec<f32>,
}

impl RetinexEnhancer {
    /// Build an enhancer from validated weights.
    pub fn new(weights: &EnhancerWeights) -> Self {
        Self {
            scales: weights.scales.clone(),
        }
    }
}

impl Enhance for RetinexEnhancer {
    fn enhance(&self, image: &RgbImage) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        let scale_weight = 1.0 / self.scales.len() as f32;

        let mut accumulated = vec![0.0f32; image.as_raw().len()];
        for sigma in &self.scales {
            let surround = gaussian_blur_f32(image, *sigma);
            for ((acc, sample), blurred) in accumulated
                .iter_mut()
                .zip(image.as_raw())
                .zip(surround.as_raw())
            {
                let center = (*sample as f32 + 1.0).ln();
                let neighborhood = (*blurred as f32 + 1.0).ln();
                *acc += scale_weight * (center - neighborhood);
            }
        }

        let (min, max) = accumulated
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        if !(max > min) {
            // Uniform input carries no local contrast to redistribute.
            return Ok(image.clone());
        }

        let stretch = 255.0 / (max - min);
        let samples: Vec<u8> = accumulated
            .iter()
            .map(|v| ((v - min) * stretch).round().clamp(0.0, 255.0) as u8)
            .collect();

        RgbImage::from_raw(width, height, samples)
            .ok_or_else(|| PipelineError::Inference("enhanced buffer size mismatch".to_string()))
    }
}
