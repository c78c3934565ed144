//! Shared per-pixel signal helpers used by the stage implementations.

use image::{ImageBuffer, Luma, RgbImage};

/// Floating-point single-channel map aligned to a source image.
pub(crate) type ResponseMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Per-pixel red-lesion response.
///
/// Dark-red retinal findings (microaneurysms, hemorrhages) have a red channel
/// that dominates the green/blue average; neutral fundus tissue scores near
/// zero. Response is clamped at zero, so a black image is all-zero.
pub(crate) fn red_lesion_response(image: &RgbImage) -> ResponseMap {
    ResponseMap::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let response = r as f32 - (g as f32 + b as f32) * 0.5;
        Luma([response.max(0.0)])
    })
}

/// Rec. 601 luminance of an RGB pixel, in `[0, 255]`.
pub(crate) fn luminance(px: [u8; 3]) -> f32 {
    0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn black_image_has_zero_response() {
        let image = RgbImage::new(8, 8);
        let response = red_lesion_response(&image);
        assert!(response.pixels().all(|p| p[0] == 0.0));
    }

    #[test]
    fn red_pixels_respond_stronger_than_gray() {
        let mut image = RgbImage::from_pixel(4, 4, Rgb([120, 120, 120]));
        image.put_pixel(1, 1, Rgb([180, 40, 30]));
        let response = red_lesion_response(&image);
        assert_eq!(response.get_pixel(0, 0)[0], 0.0);
        assert!(response.get_pixel(1, 1)[0] > 100.0);
    }
}
