//! Response assembler.
//!
//! Pure function merging orchestrator output, codec output, and the clinical
//! knowledge table into the externally visible report.

use image::{GrayImage, Rgb, RgbImage};

use fundus_pipeline::{codec, Classification, SegmentationOutput};
use fundus_values::{knowledge, AnalysisError, AnalysisReport, AnalysisResult, ImageArtifacts,
    PatientInfo};

/// Fixed highlight color composited onto lesion pixels.
const LESION_HIGHLIGHT: Rgb<u8> = Rgb([255, 0, 0]);

/// Assemble the final report from the stage outputs.
///
/// Renders the segmentation overlay, encodes all four images independently
/// to base64 PNG, and resolves description/recommendations solely from the
/// classification's stage index (the knowledge table degrades out-of-range
/// indices to the "No DR" entry rather than failing the request). Encode
/// failures surface as [`AnalysisError::Assembly`].
pub fn assemble(
    original: &RgbImage,
    enhanced: &RgbImage,
    heatmap: &RgbImage,
    segmentation: &SegmentationOutput,
    classification: Classification,
    patient: PatientInfo,
) -> AnalysisResult<AnalysisReport> {
    let overlay = overlay_segmentation(original, &segmentation.mask);
    let guidance = knowledge::lookup(classification.stage.index());

    let images = ImageArtifacts {
        original: encode(original)?,
        enhanced: encode(enhanced)?,
        heatmap: encode(heatmap)?,
        segmentation: encode(&overlay)?,
    };

    Ok(AnalysisReport {
        stage: classification.stage.label().to_string(),
        confidence: classification.confidence.clamp(0.0, 1.0),
        description: guidance.description.to_string(),
        recommendations: guidance
            .recommendations
            .iter()
            .map(|r| r.to_string())
            .collect(),
        lesion_count: segmentation.lesion_count as u64,
        images,
        patient,
    })
}

fn encode(image: &RgbImage) -> AnalysisResult<String> {
    codec::to_base64_png(image).map_err(|e| AnalysisError::assembly(e.to_string()))
}

/// Composite the lesion mask onto the original image.
///
/// Mask dimensions are guaranteed to match the image by the segmentation
/// invariant; should they ever diverge, only the overlapping region is
/// painted.
pub fn overlay_segmentation(original: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut overlay = original.clone();
    let width = original.width().min(mask.width());
    let height = original.height().min(mask.height());
    for y in 0..height {
        for x in 0..width {
            if mask.get_pixel(x, y)[0] != 0 {
                overlay.put_pixel(x, y, LESION_HIGHLIGHT);
            }
        }
    }
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    use fundus_values::DrStage;

    #[test]
    fn overlay_paints_exactly_the_mask_pixels() {
        let original = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let mut mask = GrayImage::new(8, 8);
        mask.put_pixel(3, 4, Luma([255]));
        mask.put_pixel(5, 5, Luma([255]));

        let overlay = overlay_segmentation(&original, &mask);
        assert_eq!(*overlay.get_pixel(3, 4), LESION_HIGHLIGHT);
        assert_eq!(*overlay.get_pixel(5, 5), LESION_HIGHLIGHT);
        assert_eq!(*overlay.get_pixel(0, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn mismatched_mask_paints_only_the_overlap() {
        let original = RgbImage::from_pixel(4, 4, Rgb([1, 1, 1]));
        let mask = GrayImage::from_pixel(8, 8, Luma([255]));
        let overlay = overlay_segmentation(&original, &mask);
        assert_eq!(overlay.dimensions(), (4, 4));
        assert!(overlay.pixels().all(|p| *p == LESION_HIGHLIGHT));
    }

    #[test]
    fn report_carries_guidance_images_and_passthrough() {
        let image = RgbImage::from_pixel(16, 16, Rgb([50, 60, 70]));
        let segmentation = SegmentationOutput::empty(16, 16);
        let classification = Classification {
            stage: DrStage::Mild,
            confidence: 0.73,
        };
        let patient = PatientInfo::new("P. Doe", "p@example.org");

        let report = assemble(&image, &image, &image, &segmentation, classification, patient)
            .expect("assemble");

        assert_eq!(report.stage, "Mild NPDR");
        assert_eq!(report.lesion_count, 0);
        assert_eq!(report.recommendations.len(), 3);
        assert!(report.description.contains("Microaneurysms"));
        assert_eq!(report.patient.name, "P. Doe");
        for encoded in [
            &report.images.original,
            &report.images.enhanced,
            &report.images.heatmap,
            &report.images.segmentation,
        ] {
            assert!(!encoded.is_empty());
        }
    }

    #[test]
    fn confidence_is_clamped_into_unit_interval() {
        let image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let segmentation = SegmentationOutput::empty(4, 4);
        let classification = Classification {
            stage: DrStage::NoDr,
            confidence: 1.5,
        };
        let report = assemble(
            &image,
            &image,
            &image,
            &segmentation,
            classification,
            PatientInfo::default(),
        )
        .expect("assemble");
        assert_eq!(report.confidence, 1.0);
    }
}
