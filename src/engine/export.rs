//! Multi-size export: center-crop to the target aspect ratio, then resize

use std::collections::HashSet;

use image::{imageops, RgbImage};
use tracing::debug;

use crate::domain::ExportSize;
use super::compositor::within_pixel_budget;
use super::error::{MockupError, MockupResult};

/// One export variant
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub name: String,
    pub image: RgbImage,
}

/// Crop rectangle `(x, y, width, height)` matching `target_width:target_height`
///
/// The wider-than-target case trims left/right, otherwise top/bottom. Ratios
/// are compared in integer arithmetic so exact matches never crop.
pub fn center_crop_rect(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32, u32, u32) {
    let (sw, sh) = (source_width as u64, source_height as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    if sw * th > tw * sh {
        let new_width = ((sh * tw) / th).clamp(1, sw) as u32;
        let left = (source_width - new_width) / 2;
        (left, 0, new_width, source_height)
    } else {
        let new_height = ((sw * th) / tw).clamp(1, sh) as u32;
        let top = (source_height - new_height) / 2;
        (0, top, source_width, new_height)
    }
}

/// Produce an exactly-sized variant of `mockup` for each requested size
///
/// Results keep request order. Sizes larger than `max_pixels` are rejected.
pub fn export_sizes(mockup: &RgbImage, sizes: &[ExportSize], max_pixels: u64) -> MockupResult<Vec<ExportedImage>> {
    let (source_width, source_height) = mockup.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(MockupError::InvalidArtwork("mockup has zero size".to_string()));
    }

    let mut seen = HashSet::new();
    for size in sizes {
        if size.width == 0 || size.height == 0 {
            return Err(MockupError::InvalidExportSize(format!(
                "'{}' has zero dimension ({}x{})",
                size.name, size.width, size.height
            )));
        }
        if !within_pixel_budget(size.width, size.height, max_pixels) {
            return Err(MockupError::InvalidExportSize(format!(
                "'{}' ({}x{}) exceeds the {} pixel limit",
                size.name, size.width, size.height, max_pixels
            )));
        }
        if !seen.insert(size.name.as_str()) {
            return Err(MockupError::InvalidExportSize(format!(
                "duplicate export name '{}'",
                size.name
            )));
        }
    }

    let exports = sizes
        .iter()
        .map(|size| {
            let (x, y, width, height) = center_crop_rect(source_width, source_height, size.width, size.height);
            let cropped = imageops::crop_imm(mockup, x, y, width, height).to_image();
            let image = imageops::resize(&cropped, size.width, size.height, imageops::FilterType::Lanczos3);

            debug!(
                name = %size.name,
                crop_x = x,
                crop_y = y,
                crop_width = width,
                crop_height = height,
                width = size.width,
                height = size.height,
                "Exported size"
            );

            ExportedImage {
                name: size.name.clone(),
                image,
            }
        })
        .collect();

    Ok(exports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DEFAULT_MAX_OUTPUT_PIXELS as MAX;
    use image::Rgb;

    #[test]
    fn test_wide_source_trims_sides() {
        assert_eq!(center_crop_rect(1600, 1200, 1200, 1200), (200, 0, 1200, 1200));
    }

    #[test]
    fn test_tall_source_trims_top_and_bottom() {
        assert_eq!(center_crop_rect(1200, 1600, 1200, 1200), (0, 200, 1200, 1200));
        assert_eq!(center_crop_rect(1920, 1440, 1920, 1080), (0, 180, 1920, 1080));
    }

    #[test]
    fn test_matching_ratio_keeps_everything() {
        assert_eq!(center_crop_rect(1600, 1200, 800, 600), (0, 0, 1600, 1200));
    }

    #[test]
    fn test_square_scenario_crops_center() {
        let mockup = RgbImage::from_fn(1600, 1200, |x, _| {
            if x < 200 || x >= 1400 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });

        let exports = export_sizes(&mockup, &[ExportSize::new("square_1200", 1200, 1200)], MAX).unwrap();

        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].image.dimensions(), (1200, 1200));
        // nothing from the trimmed sides survives
        assert_eq!(*exports[0].image.get_pixel(0, 600), Rgb([0, 0, 255]));
        assert_eq!(*exports[0].image.get_pixel(1199, 600), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_exact_dimensions_for_extreme_ratios() {
        let sizes = vec![
            ExportSize::new("banner", 3000, 10),
            ExportSize::new("pole", 7, 2000),
            ExportSize::new("tiny", 1, 1),
            ExportSize::new("odd", 333, 777),
        ];

        for source in [RgbImage::new(5000, 3), RgbImage::new(2, 4000), RgbImage::new(640, 480)] {
            let exports = export_sizes(&source, &sizes, MAX).unwrap();
            let names: Vec<_> = exports.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["banner", "pole", "tiny", "odd"]);
            for (export, size) in exports.iter().zip(&sizes) {
                assert_eq!(export.image.dimensions(), (size.width, size.height));
            }
        }
    }

    #[test]
    fn test_standard_presets() {
        let mockup = RgbImage::new(1920, 1440);
        let presets = ExportSize::standard_presets();
        let exports = export_sizes(&mockup, &presets, MAX).unwrap();
        for (export, size) in exports.iter().zip(&presets) {
            assert_eq!(export.image.dimensions(), (size.width, size.height));
        }
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        let mockup = RgbImage::new(10, 10);
        assert!(matches!(
            export_sizes(&mockup, &[ExportSize::new("zero", 0, 10)], MAX),
            Err(MockupError::InvalidExportSize(_))
        ));
        assert!(matches!(
            export_sizes(&mockup, &[ExportSize::new("a", 5, 5), ExportSize::new("a", 6, 6)], MAX),
            Err(MockupError::InvalidExportSize(_))
        ));
    }

    #[test]
    fn test_oversized_exports_are_rejected() {
        let mockup = RgbImage::new(10, 10);
        assert!(matches!(
            export_sizes(&mockup, &[ExportSize::new("huge", 100_000, 100_000)], MAX),
            Err(MockupError::InvalidExportSize(_))
        ));

        let sizes = [ExportSize::new("ok", 10, 10)];
        assert_eq!(export_sizes(&mockup, &sizes, 100).unwrap().len(), 1);
        assert!(matches!(export_sizes(&mockup, &sizes, 99), Err(MockupError::InvalidExportSize(_))));
    }
}
