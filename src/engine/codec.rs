//! Raster decoding and encoding at the engine boundary

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageEncoder, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::error::{MockupError, MockupResult};

/// JPEG quality used for mockup output
pub const JPEG_QUALITY: u8 = 95;

/// Output encoding for mockups and exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Decode artwork bytes; anything undecodable or empty is invalid artwork
pub fn decode_artwork(bytes: &[u8]) -> MockupResult<DynamicImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| MockupError::InvalidArtwork(format!("failed to decode: {}", e)))?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MockupError::InvalidArtwork(format!(
            "artwork has zero size ({}x{})",
            width, height
        )));
    }

    debug!(width, height, color = ?image.color(), "Artwork decoded");
    Ok(image)
}

/// Encode an opaque raster
pub fn encode(image: &RgbImage, format: OutputFormat) -> MockupResult<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ColorType::Rgb8,
            )?;
        }
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).encode_image(image)?;
        }
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_png_output_decodes_to_same_pixels() {
        let image = RgbImage::from_fn(8, 5, |x, y| Rgb([x as u8 * 30, y as u8 * 50, 7]));
        let bytes = encode(&image, OutputFormat::Png).unwrap();

        let decoded = decode_artwork(&bytes).unwrap();
        assert_eq!(decoded.to_rgb8(), image);
    }

    #[test]
    fn test_jpeg_output_has_jpeg_magic() {
        let image = RgbImage::from_pixel(16, 16, Rgb([128, 64, 32]));
        let bytes = encode(&image, OutputFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_garbage_is_invalid_artwork() {
        assert!(matches!(
            decode_artwork(b"definitely not an image"),
            Err(MockupError::InvalidArtwork(_))
        ));
    }
}
