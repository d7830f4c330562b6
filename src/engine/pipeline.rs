//! End-to-end mockup generation for one artwork and one scene

use std::sync::Arc;

use image::{DynamicImage, GenericImageView, RgbImage};
use tracing::{debug, info};

use crate::domain::{ExportSize, FrameSpec, ResolvedPlacement, SceneCatalog};
use super::compositor::{Compositor, Mockup};
use super::error::MockupResult;
use super::export::{export_sizes, ExportedImage};
use super::frame::build_framed;
use super::template::TemplateLibrary;

/// Everything produced for one artwork/scene pair
#[derive(Debug, Clone)]
pub struct MockupOutput {
    pub scene: String,
    pub template: String,
    pub framed_width: u32,
    pub framed_height: u32,
    pub placement: ResolvedPlacement,
    pub mockup: Mockup,
    pub exports: Vec<ExportedImage>,
}

/// Composes framing, scene resolution, compositing and export
///
/// The scene catalog and template library are explicit, shared, read-only
/// inputs; each call is independent of every other.
#[derive(Clone)]
pub struct MockupPipeline {
    catalog: Arc<SceneCatalog>,
    templates: Arc<TemplateLibrary>,
    compositor: Compositor,
}

impl MockupPipeline {
    pub fn new(catalog: Arc<SceneCatalog>, templates: Arc<TemplateLibrary>, compositor: Compositor) -> Self {
        MockupPipeline {
            catalog,
            templates,
            compositor,
        }
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    /// Frame only, no scene
    pub fn frame(&self, artwork: &DynamicImage, frame: &FrameSpec) -> MockupResult<RgbImage> {
        build_framed(artwork, frame, self.compositor.max_output_pixels())
    }

    /// Generate a mockup of `artwork` in `scene`, plus any requested exports
    pub fn generate(
        &self,
        artwork: &DynamicImage,
        scene: &str,
        frame: &FrameSpec,
        exports: &[ExportSize],
    ) -> MockupResult<MockupOutput> {
        let entry = self.catalog.get(scene)?;
        let template = self.templates.get(&entry.template)?;
        let (template_width, template_height) = template.dimensions();

        let placement = self.catalog.resolve(scene, template_width, template_height)?;
        debug!(
            scene = %scene,
            template = %entry.template,
            target = ?placement.target,
            style = ?placement.style,
            "Resolved scene placement"
        );

        let max_pixels = self.compositor.max_output_pixels();
        let framed = build_framed(artwork, frame, max_pixels)?;
        let (framed_width, framed_height) = framed.dimensions();

        let mockup = self.compositor.composite(&framed, &template, &placement)?;
        let exports = export_sizes(&mockup.image, exports, max_pixels)?;

        info!(
            scene = %scene,
            artwork_width = artwork.width(),
            artwork_height = artwork.height(),
            framed_width,
            framed_height,
            placed_width = mockup.placed.width,
            placed_height = mockup.placed.height,
            exports = exports.len(),
            edge_policy = ?self.compositor.edge_policy(),
            "Mockup generation complete"
        );

        Ok(MockupOutput {
            scene: scene.to_string(),
            template: entry.template.clone(),
            framed_width,
            framed_height,
            placement,
            mockup,
            exports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use image::{Rgb, Rgba, RgbaImage};
    use crate::domain::{SceneConfig, SceneEntry};
    use crate::engine::MockupError;

    fn pipeline() -> MockupPipeline {
        let mut scenes = BTreeMap::new();
        scenes.insert(
            "living_room".to_string(),
            SceneEntry {
                label: Some("Living Room (Above Sofa)".to_string()),
                template: "living_room.jpg".to_string(),
                placement: SceneConfig::anchor(0.5, 0.20, 0.20, 0.25),
            },
        );
        scenes.insert(
            "office".to_string(),
            SceneEntry {
                label: None,
                template: "office.jpg".to_string(),
                placement: SceneConfig::anchor(0.5, 0.3, 0.3, 0.35),
            },
        );

        let templates = TemplateLibrary::from_images(vec![(
            "living_room.jpg".to_string(),
            RgbImage::from_pixel(2000, 1500, Rgb([245, 242, 239])),
        )]);

        MockupPipeline::new(
            Arc::new(SceneCatalog::new(scenes).unwrap()),
            Arc::new(templates),
            Compositor::default(),
        )
    }

    fn artwork() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(1000, 1250, Rgba([90, 20, 60, 255])))
    }

    #[test]
    fn test_generate_end_to_end() {
        let exports = vec![ExportSize::new("square_1200", 1200, 1200)];
        let output = pipeline()
            .generate(&artwork(), "living_room", &FrameSpec::new(0.08, 30), &exports)
            .unwrap();

        assert_eq!((output.framed_width, output.framed_height), (1240, 1470));
        assert_eq!(output.mockup.image.dimensions(), (2000, 1500));
        assert_eq!((output.mockup.placed.width, output.mockup.placed.height), (316, 375));
        assert_eq!(output.exports.len(), 1);
        assert_eq!(output.exports[0].image.dimensions(), (1200, 1200));
        assert_eq!(output.template, "living_room.jpg");
    }

    #[test]
    fn test_unknown_scene() {
        let err = pipeline()
            .generate(&artwork(), "garage", &FrameSpec::default(), &[])
            .unwrap_err();
        assert!(matches!(err, MockupError::UnknownScene(name) if name == "garage"));
    }

    #[test]
    fn test_missing_template() {
        let err = pipeline()
            .generate(&artwork(), "office", &FrameSpec::default(), &[])
            .unwrap_err();
        assert!(matches!(err, MockupError::TemplateLoad { template, .. } if template == "office.jpg"));
    }

    #[test]
    fn test_zero_size_artwork() {
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        let err = pipeline()
            .generate(&empty, "living_room", &FrameSpec::default(), &[])
            .unwrap_err();
        assert!(matches!(err, MockupError::InvalidArtwork(_)));
    }

    #[test]
    fn test_output_pixel_limit() {
        let base = pipeline();
        let capped = MockupPipeline::new(
            base.catalog.clone(),
            base.templates.clone(),
            Compositor::default().with_max_output_pixels(1_000_000),
        );

        // framed 1240x1470 is over a one-megapixel cap
        let err = capped.frame(&artwork(), &FrameSpec::new(0.08, 30)).unwrap_err();
        assert!(matches!(err, MockupError::InvalidFrameSpec(_)));

        let small = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 125, Rgba([1, 2, 3, 255])));
        let err = capped
            .generate(&small, "living_room", &FrameSpec::default(), &[ExportSize::new("big", 2000, 1000)])
            .unwrap_err();
        assert!(matches!(err, MockupError::InvalidExportSize(_)));
    }
}
