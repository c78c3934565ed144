//! Image codec: decode uploaded bytes into the canonical in-memory
//! representation and encode images back to the transport format.
//!
//! The canonical representation is [`image::RgbImage`]: 8-bit RGB, row-major,
//! contiguous. Transport format is lossless PNG wrapped in standard base64.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};

use crate::error::{PipelineError, Result};

/// Maximum accepted upload size. Bounds decoder memory on corrupt or
/// adversarial buffers.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Decode an uploaded byte buffer into the canonical RGB representation.
///
/// Rejects empty buffers, oversized buffers, undecodable data, and
/// zero-dimension images. Any decodable color type is converted to RGB8.
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(PipelineError::InputTooLarge {
            actual: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PipelineError::Decode(e.to_string()))?
        .to_rgb8();

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PipelineError::Decode(
            "image has zero width or height".to_string(),
        ));
    }

    Ok(decoded)
}

/// Encode an image as lossless PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode an image as PNG wrapped in standard base64 for transport.
pub fn to_base64_png(image: &RgbImage) -> Result<String> {
    Ok(STANDARD.encode(encode_png(image)?))
}
