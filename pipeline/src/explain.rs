//! Explanation stage: saliency heatmap rendering.

use image::{Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;

use fundus_values::DrStage;

use crate::base::Explain;
use crate::error::Result;
use crate::response::red_lesion_response;
use crate::weights::ExplainerWeights;

/// Saliency heatmap explainer.
///
/// Smooths the red-lesion response into a saliency field, scales it by the
/// predicted stage's severity, and renders it through a blue-to-red colormap
/// blended over the source image. A zero saliency field (healthy image)
/// renders as an unblended cool heatmap over the source.
pub struct SaliencyExplainer {
    smoothing_sigma: f32,
    blend: f32,
}

impl SaliencyExplainer {
    /// Build an explainer from validated weights.
    pub fn new(weights: &ExplainerWeights) -> Self {
        Self {
            smoothing_sigma: weights.smoothing_sigma,
            blend: weights.blend,
        }
    }
}

/// Three-stop blue → green → red colormap over `t` in `[0, 1]`.
fn colormap(t: f32) -> [f32; 3] {
    if t < 0.5 {
        let u = t * 2.0;
        [0.0, 255.0 * u, 255.0 * (1.0 - u)]
    } else {
        let u = (t - 0.5) * 2.0;
        [255.0 * u, 255.0 * (1.0 - u), 0.0]
    }
}

impl Explain for SaliencyExplainer {
    fn explain(&self, image: &RgbImage, stage: DrStage) -> Result<RgbImage> {
        let saliency = gaussian_blur_f32(&red_lesion_response(image), self.smoothing_sigma);
        let peak = saliency.pixels().map(|p| p[0]).fold(0.0f32, f32::max);
        let severity = (stage.index() as f32 + 1.0) / DrStage::COUNT as f32;

        let mut heatmap = RgbImage::new(image.width(), image.height());
        for (x, y, pixel) in heatmap.enumerate_pixels_mut() {
            let intensity = if peak > 0.0 {
                (saliency.get_pixel(x, y)[0] / peak * severity).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let heat = colormap(intensity);
            let base = image.get_pixel(x, y).0;
            for channel in 0..3 {
                let mixed =
                    base[channel] as f32 * (1.0 - self.blend) + heat[channel] * self.blend;
                pixel[channel] = mixed.round().clamp(0.0, 255.0) as u8;
            }
        }
        Ok(heatmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explainer() -> SaliencyExplainer {
        SaliencyExplainer::new(&ExplainerWeights::default())
    }

    #[test]
    fn heatmap_dimensions_match_input() {
        let image = RgbImage::new(33, 47);
        let heatmap = explainer()
            .explain(&image, DrStage::Moderate)
            .expect("explain");
        assert_eq!(heatmap.dimensions(), image.dimensions());
    }

    #[test]
    fn lesion_pixels_render_warmer_than_background() {
        let mut image = RgbImage::from_pixel(48, 48, Rgb([90, 90, 90]));
        for y in 20..28 {
            for x in 20..28 {
                image.put_pixel(x, y, Rgb([220, 30, 30]));
            }
        }
        let heatmap = explainer()
            .explain(&image, DrStage::Proliferative)
            .expect("explain");
        let lesion = heatmap.get_pixel(24, 24).0;
        let corner = heatmap.get_pixel(2, 2).0;
        // Warm colors carry more red relative to blue than cool ones.
        let warmth = |p: [u8; 3]| p[0] as i32 - p[2] as i32;
        assert!(warmth(lesion) > warmth(corner));
    }

    #[test]
    fn explanation_is_deterministic() {
        let image = RgbImage::from_fn(30, 30, |x, y| {
            Rgb([(x * 8 % 256) as u8, 50, (y * 8 % 256) as u8])
        });
        let first = explainer().explain(&image, DrStage::Mild).expect("explain");
        let second = explainer().explain(&image, DrStage::Mild).expect("explain");
        assert_eq!(first.as_raw(), second.as_raw());
    }
}
