//! Image compositing pipeline
//!
//! Fits framed artwork into a resolved target box (shrink-only, aspect
//! preserving) and pastes it onto a copy of the scene template.

use image::{imageops, GenericImageView, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{PlacementStyle, ResolvedPlacement, TargetBox};
use super::error::{MockupError, MockupResult};

/// What to do when the placement would hang off the template edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Paste where the box says; pixels outside the template are dropped
    #[default]
    Allow,
    /// Shift the placement inside the template when it fits
    Clamp,
}

/// Where the framed artwork ended up on the template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PlacedArtwork {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    /// Applied scale factor, always <= 1
    pub scale: f64,
}

/// A finished mockup
#[derive(Debug, Clone)]
pub struct Mockup {
    pub image: RgbImage,
    pub placed: PlacedArtwork,
}

/// Shrink `(width, height)` to fit inside `(max_width, max_height)`
///
/// Returns the new size and the scale applied. Never enlarges. Both axes
/// use the same scale and the same rounding.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32, f64) {
    if width <= max_width && height <= max_height {
        return (width, height, 1.0);
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));

    (new_width, new_height, scale)
}

/// Usable area of a resolved box: the box itself for anchor placements, the
/// box scaled by the reserved fraction (same center) for region placements
pub fn usable_area(target: &TargetBox, style: PlacementStyle) -> TargetBox {
    let (center_x, center_y) = target.center();
    match style {
        PlacementStyle::Anchor => *target,
        PlacementStyle::Region { reserved_fraction } => {
            let width = (target.width as f64 * reserved_fraction).floor() as u32;
            let height = (target.height as f64 * reserved_fraction).floor() as u32;
            TargetBox {
                x: center_x - (width / 2) as i64,
                y: center_y - (height / 2) as i64,
                width,
                height,
            }
        }
    }
}

/// Largest raster (width * height) the engine will allocate by default
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Whether a `width` x `height` raster stays within `max_pixels`
pub(crate) fn within_pixel_budget(width: u32, height: u32, max_pixels: u64) -> bool {
    width as u64 * height as u64 <= max_pixels
}

/// Image compositor for placing framed artwork on templates
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    edge_policy: EdgePolicy,
    max_output_pixels: u64,
}

impl Default for Compositor {
    fn default() -> Self {
        Compositor::new(EdgePolicy::default())
    }
}

impl Compositor {
    pub fn new(edge_policy: EdgePolicy) -> Self {
        Compositor {
            edge_policy,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }

    /// Cap on the size of framed rasters and exports
    pub fn with_max_output_pixels(mut self, max_output_pixels: u64) -> Self {
        self.max_output_pixels = max_output_pixels;
        self
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    pub fn max_output_pixels(&self) -> u64 {
        self.max_output_pixels
    }

    /// Composite framed artwork onto a copy of the template
    pub fn composite(
        &self,
        framed: &RgbImage,
        template: &RgbImage,
        placement: &ResolvedPlacement,
    ) -> MockupResult<Mockup> {
        let (framed_width, framed_height) = framed.dimensions();
        if framed_width == 0 || framed_height == 0 {
            return Err(MockupError::InvalidArtwork("framed artwork has zero size".to_string()));
        }

        let usable = usable_area(&placement.target, placement.style);
        if usable.width == 0 || usable.height == 0 {
            return Err(MockupError::InvalidScene(format!(
                "usable area is empty ({}x{})",
                usable.width, usable.height
            )));
        }

        let (width, height, scale) = fit_within(framed_width, framed_height, usable.width, usable.height);
        let resized;
        let artwork = if scale < 1.0 {
            resized = imageops::resize(framed, width, height, imageops::FilterType::Lanczos3);
            &resized
        } else {
            framed
        };

        let (center_x, center_y) = usable.center();
        let (x, y) = self.paste_origin(
            center_x - (width / 2) as i64,
            center_y - (height / 2) as i64,
            (width, height),
            template.dimensions(),
        );

        debug!(
            usable_width = usable.width,
            usable_height = usable.height,
            placed_width = width,
            placed_height = height,
            scale,
            x,
            y,
            edge_policy = ?self.edge_policy,
            "Calculated artwork placement"
        );

        let mut image = template.clone();
        imageops::replace(&mut image, artwork, x, y);

        Ok(Mockup {
            image,
            placed: PlacedArtwork { x, y, width, height, scale },
        })
    }

    fn paste_origin(&self, x: i64, y: i64, size: (u32, u32), template: (u32, u32)) -> (i64, i64) {
        match self.edge_policy {
            EdgePolicy::Allow => (x, y),
            EdgePolicy::Clamp => (
                clamp_axis(x, size.0, template.0),
                clamp_axis(y, size.1, template.1),
            ),
        }
    }
}

/// Keep `[pos, pos + len)` inside `[0, limit)` when it fits; otherwise leave it
fn clamp_axis(pos: i64, len: u32, limit: u32) -> i64 {
    if len > limit {
        return pos;
    }
    pos.clamp(0, (limit - len) as i64)
}
