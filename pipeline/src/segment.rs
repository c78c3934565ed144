//! Lesion segmentation stage.

use std::collections::{BTreeMap, BTreeSet};

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::base::{Segment, SegmentationOutput};
use crate::error::Result;
use crate::response::red_lesion_response;
use crate::weights::SegmenterWeights;

/// Threshold-and-label lesion segmenter.
///
/// Pixels whose red-lesion response exceeds the threshold are candidate
/// lesion pixels; 8-connected regions below the minimum area are discarded as
/// noise. The surviving regions form the mask, the lesion count, and the
/// per-region outer contours.
pub struct LesionSegmenter {
    threshold: f32,
    min_area: u32,
}

impl LesionSegmenter {
    /// Build a segmenter from validated weights.
    pub fn new(weights: &SegmenterWeights) -> Self {
        Self {
            threshold: weights.threshold,
            min_area: weights.min_area,
        }
    }
}

impl Segment for LesionSegmenter {
    fn segment(&self, image: &RgbImage) -> Result<SegmentationOutput> {
        let (width, height) = image.dimensions();
        let response = red_lesion_response(image);

        let mut candidates = GrayImage::new(width, height);
        for (x, y, pixel) in response.enumerate_pixels() {
            if pixel[0] >= self.threshold {
                candidates.put_pixel(x, y, Luma([255]));
            }
        }

        let labelled = connected_components(&candidates, Connectivity::Eight, Luma([0u8]));

        let mut areas: BTreeMap<u32, u32> = BTreeMap::new();
        for pixel in labelled.pixels() {
            if pixel[0] != 0 {
                *areas.entry(pixel[0]).or_insert(0) += 1;
            }
        }
        let keep: BTreeSet<u32> = areas
            .into_iter()
            .filter(|(_, area)| *area >= self.min_area)
            .map(|(label, _)| label)
            .collect();

        if keep.is_empty() {
            return Ok(SegmentationOutput::empty(width, height));
        }

        let mut mask = GrayImage::new(width, height);
        for (x, y, pixel) in labelled.enumerate_pixels() {
            if keep.contains(&pixel[0]) {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let regions = find_contours::<u32>(&mask)
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer)
            .map(|contour| {
                contour
                    .points
                    .into_iter()
                    .map(|point| (point.x, point.y))
                    .collect()
            })
            .collect();

        Ok(SegmentationOutput {
            mask,
            lesion_count: keep.len(),
            regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn segmenter() -> LesionSegmenter {
        LesionSegmenter::new(&SegmenterWeights::default())
    }

    /// Paint a filled square of strongly red pixels.
    fn paint_lesion(image: &mut RgbImage, x0: u32, y0: u32, side: u32) {
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                image.put_pixel(x, y, Rgb([200, 30, 30]));
            }
        }
    }

    #[test]
    fn black_image_has_no_lesions() {
        let image = RgbImage::new(64, 64);
        let output = segmenter().segment(&image).expect("segment");
        assert_eq!(output.lesion_count, 0);
        assert!(output.regions.is_empty());
        assert!(output.mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn mask_dimensions_match_input() {
        let image = RgbImage::new(41, 29);
        let output = segmenter().segment(&image).expect("segment");
        assert_eq!(output.mask.dimensions(), image.dimensions());
    }

    #[test]
    fn distinct_regions_are_counted_separately() {
        let mut image = RgbImage::from_pixel(64, 64, Rgb([90, 90, 90]));
        paint_lesion(&mut image, 5, 5, 6);
        paint_lesion(&mut image, 40, 40, 8);
        let output = segmenter().segment(&image).expect("segment");
        assert_eq!(output.lesion_count, 2);
        assert_eq!(output.regions.len(), 2);
    }

    #[test]
    fn tiny_specks_are_filtered_as_noise() {
        let mut image = RgbImage::from_pixel(32, 32, Rgb([90, 90, 90]));
        // 2x2 = 4 pixels, below the default 12 pixel minimum area.
        paint_lesion(&mut image, 10, 10, 2);
        let output = segmenter().segment(&image).expect("segment");
        assert_eq!(output.lesion_count, 0);
    }

    #[test]
    fn mask_covers_the_lesion_pixels() {
        let mut image = RgbImage::from_pixel(32, 32, Rgb([90, 90, 90]));
        paint_lesion(&mut image, 8, 8, 5);
        let output = segmenter().segment(&image).expect("segment");
        assert_eq!(output.lesion_count, 1);
        assert_eq!(output.mask.get_pixel(10, 10)[0], 255);
        assert_eq!(output.mask.get_pixel(0, 0)[0], 0);
    }
}
