//! Mat and frame construction
//!
//! Produces an opaque framed raster: frame stroke on the outside, mat inside
//! it, artwork flattened onto the mat color in the middle.

use image::{imageops, DynamicImage, GenericImageView, Rgb, RgbImage, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::domain::{FrameSpec, RgbColor};
use super::compositor::within_pixel_budget;
use super::error::{MockupError, MockupResult};

/// Alpha-composite artwork onto an opaque background color
///
/// Transparent regions take on `background` exactly.
pub fn flatten_onto(artwork: &RgbaImage, background: RgbColor) -> RgbImage {
    let (width, height) = artwork.dimensions();
    let bg = background.0;

    RgbImage::from_fn(width, height, |x, y| {
        let px = artwork.get_pixel(x, y).0;
        let alpha = px[3] as u32;
        let inv_alpha = 255 - alpha;

        let mut out = [0u8; 3];
        for i in 0..3 {
            out[i] = ((px[i] as u32 * alpha + bg[i] as u32 * inv_alpha + 127) / 255) as u8;
        }
        Rgb(out)
    })
}

/// Wrap artwork in a mat and frame
///
/// Fails with `InvalidFrameSpec` when the framed raster would exceed
/// `max_pixels` or its sides would overflow.
pub fn build_framed(artwork: &DynamicImage, spec: &FrameSpec, max_pixels: u64) -> MockupResult<RgbImage> {
    let (art_width, art_height) = artwork.dimensions();
    if art_width == 0 || art_height == 0 {
        return Err(MockupError::InvalidArtwork(format!(
            "artwork has zero size ({}x{})",
            art_width, art_height
        )));
    }
    spec.validate().map_err(MockupError::InvalidFrameSpec)?;

    let mat_width = spec.mat_width_px(art_width);
    let frame_width = spec.frame_width_px;
    let (total_width, total_height) = spec.framed_dimensions(art_width, art_height).ok_or_else(|| {
        MockupError::InvalidFrameSpec(format!(
            "frame_width_px {} is too large for a {}x{} artwork",
            frame_width, art_width, art_height
        ))
    })?;
    if !within_pixel_budget(total_width, total_height, max_pixels) {
        return Err(MockupError::InvalidFrameSpec(format!(
            "framed raster {}x{} exceeds the {} pixel limit",
            total_width, total_height, max_pixels
        )));
    }

    let mut canvas = RgbImage::from_pixel(total_width, total_height, spec.mat_color.to_pixel());

    if frame_width > 0 {
        stroke_border(&mut canvas, frame_width, spec.frame_color.to_pixel());
    }

    let flattened = flatten_onto(&artwork.to_rgba8(), spec.mat_color);
    let offset = (frame_width + mat_width) as i64;
    imageops::replace(&mut canvas, &flattened, offset, offset);

    debug!(
        art_width,
        art_height,
        mat_width,
        frame_width,
        framed_width = total_width,
        framed_height = total_height,
        "Built framed artwork"
    );

    Ok(canvas)
}

/// Stroke a rectangular outline of `thickness` along the canvas edge
fn stroke_border(canvas: &mut RgbImage, thickness: u32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let t = thickness.min(width).min(height);

    let strips = [
        Rect::at(0, 0).of_size(width, t),
        Rect::at(0, (height - t) as i32).of_size(width, t),
        Rect::at(0, 0).of_size(t, height),
        Rect::at((width - t) as i32, 0).of_size(t, height),
    ];

    for strip in strips {
        draw_filled_rect_mut(canvas, strip, color);
    }
}
