//! Frame specification for the mat and frame border around artwork
//!
//! The mat width is a fraction of the artwork's *width* and is applied to
//! both axes. The frame width is an absolute pixel count.

use std::fmt;

use image::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Default mat width as a fraction of artwork width
pub const DEFAULT_MAT_WIDTH_FRACTION: f64 = 0.08;

/// Default frame thickness in pixels
pub const DEFAULT_FRAME_WIDTH_PX: u32 = 30;

/// Color parsing errors
#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("Color must be '#RRGGBB', got '{0}'")]
    Malformed(String),
}

/// Opaque RGB color, serialized as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor(pub [u8; 3]);

impl RgbColor {
    pub const WHITE: RgbColor = RgbColor([255, 255, 255]);
    pub const BLACK: RgbColor = RgbColor([0, 0, 0]);

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string
    pub fn from_hex(value: &str) -> Result<Self, ColorError> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorError::Malformed(value.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorError::Malformed(value.to_string()))
        };

        Ok(RgbColor([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_pixel(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl TryFrom<String> for RgbColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RgbColor::from_hex(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_string()
    }
}

/// Named frame finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FramePreset {
    BlackMetal,
    WhiteWood,
    GoldOrnate,
    NaturalOak,
}

impl FramePreset {
    /// Frame color for this finish
    pub fn frame_color(self) -> RgbColor {
        match self {
            FramePreset::BlackMetal => RgbColor([0x1a, 0x1a, 0x1a]),
            FramePreset::WhiteWood => RgbColor([0xF5, 0xF5, 0xF5]),
            FramePreset::GoldOrnate => RgbColor([0xD4, 0xAF, 0x37]),
            FramePreset::NaturalOak => RgbColor([0xDE, 0xB8, 0x87]),
        }
    }
}

/// Mat and frame geometry and colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FrameSpec {
    /// Mat width as a fraction of artwork width, in [0, 1)
    #[serde(default = "default_mat_width_fraction")]
    pub mat_width_fraction: f64,

    /// Frame thickness in pixels
    #[serde(default = "default_frame_width_px")]
    pub frame_width_px: u32,

    #[serde(default = "default_mat_color")]
    #[schema(value_type = String, example = "#FFFFFF")]
    pub mat_color: RgbColor,

    #[serde(default = "default_frame_color")]
    #[schema(value_type = String, example = "#000000")]
    pub frame_color: RgbColor,
}

fn default_mat_width_fraction() -> f64 { DEFAULT_MAT_WIDTH_FRACTION }
fn default_frame_width_px() -> u32 { DEFAULT_FRAME_WIDTH_PX }
fn default_mat_color() -> RgbColor { RgbColor::WHITE }
fn default_frame_color() -> RgbColor { RgbColor::BLACK }

impl FrameSpec {
    pub fn new(mat_width_fraction: f64, frame_width_px: u32) -> Self {
        FrameSpec {
            mat_width_fraction,
            frame_width_px,
            ..FrameSpec::default()
        }
    }

    /// A spec with no mat and no frame
    pub fn bare() -> Self {
        FrameSpec::new(0.0, 0)
    }

    /// Apply a named finish, keeping geometry and mat color
    pub fn with_preset(mut self, preset: FramePreset) -> Self {
        self.frame_color = preset.frame_color();
        self
    }

    /// Mat width in pixels for an artwork of the given width
    pub fn mat_width_px(&self, artwork_width: u32) -> u32 {
        (artwork_width as f64 * self.mat_width_fraction).floor() as u32
    }

    /// Total border (mat + frame) on each side, in pixels; `None` on overflow
    pub fn border_px(&self, artwork_width: u32) -> Option<u32> {
        self.mat_width_px(artwork_width).checked_add(self.frame_width_px)
    }

    /// Dimensions of the framed raster for an artwork of the given size
    ///
    /// `None` when either side does not fit in a `u32`.
    pub fn framed_dimensions(&self, artwork_width: u32, artwork_height: u32) -> Option<(u32, u32)> {
        let both_sides = self.border_px(artwork_width)?.checked_mul(2)?;
        Some((
            artwork_width.checked_add(both_sides)?,
            artwork_height.checked_add(both_sides)?,
        ))
    }

    /// Returns a description of the problem when the mat fraction is unusable
    pub fn validate(&self) -> Result<(), String> {
        if !self.mat_width_fraction.is_finite()
            || self.mat_width_fraction < 0.0
            || self.mat_width_fraction >= 1.0
        {
            return Err(format!(
                "mat_width_fraction must be in [0, 1), got {}",
                self.mat_width_fraction
            ));
        }
        Ok(())
    }
}

impl Default for FrameSpec {
    fn default() -> Self {
        FrameSpec {
            mat_width_fraction: DEFAULT_MAT_WIDTH_FRACTION,
            frame_width_px: DEFAULT_FRAME_WIDTH_PX,
            mat_color: RgbColor::WHITE,
            frame_color: RgbColor::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(RgbColor::from_hex("#D4AF37").unwrap(), RgbColor([0xD4, 0xAF, 0x37]));
        assert_eq!(RgbColor::from_hex("ffffff").unwrap(), RgbColor::WHITE);
        assert!(RgbColor::from_hex("#fff").is_err());
        assert!(RgbColor::from_hex("#GG0000").is_err());
        assert_eq!(RgbColor([0x1a, 0, 0xff]).to_string(), "#1A00FF");
    }

    #[test]
    fn test_mat_is_derived_from_width() {
        let spec = FrameSpec::new(0.08, 30);
        assert_eq!(spec.mat_width_px(1000), 80);
        assert_eq!(spec.framed_dimensions(1000, 1250), Some((1240, 1470)));
    }

    #[test]
    fn test_framed_dimensions_overflow_is_none() {
        assert_eq!(FrameSpec::new(0.0, u32::MAX / 2 + 1).framed_dimensions(4, 4), None);
        assert_eq!(FrameSpec::new(0.0, u32::MAX).border_px(10), None);
        assert_eq!(FrameSpec::new(0.0, 10).framed_dimensions(u32::MAX - 10, 1), None);
        assert_eq!(FrameSpec::new(0.0, 5).framed_dimensions(u32::MAX - 10, 1), Some((u32::MAX, 11)));
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        assert!(FrameSpec::new(1.0, 0).validate().is_err());
        assert!(FrameSpec::new(-0.1, 0).validate().is_err());
        assert!(FrameSpec::new(f64::NAN, 0).validate().is_err());
        assert!(FrameSpec::bare().validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let spec: FrameSpec = serde_json::from_str(r##"{"frame_width_px": 20, "mat_color": "#FAFAFA"}"##).unwrap();
        assert_eq!(spec.frame_width_px, 20);
        assert_eq!(spec.mat_width_fraction, DEFAULT_MAT_WIDTH_FRACTION);
        assert_eq!(spec.mat_color, RgbColor([0xFA, 0xFA, 0xFA]));
        assert_eq!(spec.frame_color, RgbColor::BLACK);
    }

    #[test]
    fn test_preset_sets_frame_color_only() {
        let spec = FrameSpec::default().with_preset(FramePreset::GoldOrnate);
        assert_eq!(spec.frame_color, RgbColor([0xD4, 0xAF, 0x37]));
        assert_eq!(spec.mat_color, RgbColor::WHITE);
    }
}
