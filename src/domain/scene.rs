//! Scene placement configuration and target box resolution
//!
//! A scene declares where framed artwork goes on its template, in fractions
//! of the template's dimensions. Two declaration styles exist:
//!
//! - **Anchor**: a center point plus maximum box fractions. The artwork may
//!   use the whole box.
//! - **Region**: an explicit rectangle. Only `reserved_fraction` of it (per
//!   axis) is used by the artwork, the rest is margin.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Portion of a region box available to the artwork unless configured otherwise
pub const DEFAULT_RESERVED_FRACTION: f64 = 0.7;

/// Placement errors
#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    #[error("{field} must be in [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },
    #[error("reserved_fraction must be in (0, 1], got {0}")]
    InvalidReservedFraction(f64),
    #[error("Scene resolves to an empty box ({width}x{height}) on a {template_width}x{template_height} template")]
    EmptyBox {
        width: u32,
        height: u32,
        template_width: u32,
        template_height: u32,
    },
}

/// How region `x`/`y` are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegionOrigin {
    /// `x`/`y` is the rectangle's top-left corner
    #[default]
    TopLeft,
    /// `x`/`y` is the rectangle's center
    Center,
}

/// Declarative placement of artwork on a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum SceneConfig {
    Anchor {
        anchor_x: f64,
        anchor_y: f64,
        max_width_fraction: f64,
        max_height_fraction: f64,
    },
    Region {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        origin: RegionOrigin,
        #[serde(default = "default_reserved_fraction")]
        reserved_fraction: f64,
    },
}

fn default_reserved_fraction() -> f64 { DEFAULT_RESERVED_FRACTION }

impl SceneConfig {
    pub fn anchor(anchor_x: f64, anchor_y: f64, max_width_fraction: f64, max_height_fraction: f64) -> Self {
        SceneConfig::Anchor {
            anchor_x,
            anchor_y,
            max_width_fraction,
            max_height_fraction,
        }
    }

    /// Top-left region with the default reserved fraction
    pub fn region(x: f64, y: f64, width: f64, height: f64) -> Self {
        SceneConfig::Region {
            x,
            y,
            width,
            height,
            origin: RegionOrigin::TopLeft,
            reserved_fraction: DEFAULT_RESERVED_FRACTION,
        }
    }

    /// Check that every fraction is finite and in range
    pub fn validate(&self) -> Result<(), PlacementError> {
        match *self {
            SceneConfig::Anchor {
                anchor_x,
                anchor_y,
                max_width_fraction,
                max_height_fraction,
            } => {
                check_fraction("anchor_x", anchor_x)?;
                check_fraction("anchor_y", anchor_y)?;
                check_fraction("max_width_fraction", max_width_fraction)?;
                check_fraction("max_height_fraction", max_height_fraction)
            }
            SceneConfig::Region {
                x,
                y,
                width,
                height,
                reserved_fraction,
                ..
            } => {
                check_fraction("x", x)?;
                check_fraction("y", y)?;
                check_fraction("width", width)?;
                check_fraction("height", height)?;
                if !reserved_fraction.is_finite() || reserved_fraction <= 0.0 || reserved_fraction > 1.0 {
                    return Err(PlacementError::InvalidReservedFraction(reserved_fraction));
                }
                Ok(())
            }
        }
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), PlacementError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlacementError::FractionOutOfRange { field, value })
    }
}

/// Target rectangle in template pixel space (top-left origin)
///
/// `x`/`y` may be negative when a box hangs off the template edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TargetBox {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl TargetBox {
    /// Integer center point
    pub fn center(&self) -> (i64, i64) {
        (self.x + (self.width / 2) as i64, self.y + (self.height / 2) as i64)
    }
}

/// How the compositor treats the resolved box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum PlacementStyle {
    /// Artwork may fill the whole box
    Anchor,
    /// Artwork is limited to `reserved_fraction` of the box on each axis
    Region { reserved_fraction: f64 },
}

impl PlacementStyle {
    /// Fraction of the box usable by the artwork on each axis
    pub fn reserved_fraction(&self) -> f64 {
        match *self {
            PlacementStyle::Anchor => 1.0,
            PlacementStyle::Region { reserved_fraction } => reserved_fraction,
        }
    }
}

/// A scene resolved against concrete template dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ResolvedPlacement {
    pub target: TargetBox,
    pub style: PlacementStyle,
}

/// Resolve a scene's declarative placement to a pixel box on a template
pub fn resolve_box(
    template_width: u32,
    template_height: u32,
    scene: &SceneConfig,
) -> Result<ResolvedPlacement, PlacementError> {
    scene.validate()?;

    let tw = template_width as f64;
    let th = template_height as f64;

    let resolved = match *scene {
        SceneConfig::Anchor {
            anchor_x,
            anchor_y,
            max_width_fraction,
            max_height_fraction,
        } => {
            let width = (tw * max_width_fraction).floor() as u32;
            let height = (th * max_height_fraction).floor() as u32;
            let center_x = (tw * anchor_x).round() as i64;
            let center_y = (th * anchor_y).round() as i64;

            ResolvedPlacement {
                target: TargetBox {
                    x: center_x - (width / 2) as i64,
                    y: center_y - (height / 2) as i64,
                    width,
                    height,
                },
                style: PlacementStyle::Anchor,
            }
        }
        SceneConfig::Region {
            x,
            y,
            width,
            height,
            origin,
            reserved_fraction,
        } => {
            let box_width = (tw * width).floor() as u32;
            let box_height = (th * height).floor() as u32;
            let px = (tw * x).floor() as i64;
            let py = (th * y).floor() as i64;

            let (left, top) = match origin {
                RegionOrigin::TopLeft => (px, py),
                RegionOrigin::Center => (px - (box_width / 2) as i64, py - (box_height / 2) as i64),
            };

            ResolvedPlacement {
                target: TargetBox {
                    x: left,
                    y: top,
                    width: box_width,
                    height: box_height,
                },
                style: PlacementStyle::Region { reserved_fraction },
            }
        }
    };

    if resolved.target.width == 0 || resolved.target.height == 0 {
        return Err(PlacementError::EmptyBox {
            width: resolved.target.width,
            height: resolved.target.height,
            template_width,
            template_height,
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_box_is_centered_on_anchor() {
        let scene = SceneConfig::anchor(0.5, 0.20, 0.20, 0.25);
        let resolved = resolve_box(2000, 1500, &scene).unwrap();

        assert_eq!(resolved.style, PlacementStyle::Anchor);
        assert_eq!(
            resolved.target,
            TargetBox { x: 800, y: 113, width: 400, height: 375 }
        );
        assert_eq!(resolved.target.center(), (1000, 300));
    }

    #[test]
    fn test_anchor_center_uses_rounding() {
        // 999 * 0.5 = 499.5 rounds away from zero
        let scene = SceneConfig::anchor(0.5, 0.5, 0.1, 0.1);
        let resolved = resolve_box(999, 999, &scene).unwrap();
        assert_eq!(resolved.target.center(), (500, 500));
    }

    #[test]
    fn test_anchor_near_edge_may_go_negative() {
        let scene = SceneConfig::anchor(0.0, 0.0, 0.5, 0.5);
        let resolved = resolve_box(100, 100, &scene).unwrap();
        assert_eq!(resolved.target.x, -25);
        assert_eq!(resolved.target.y, -25);
    }

    #[test]
    fn test_region_top_left() {
        let scene = SceneConfig::region(0.25, 0.15, 0.35, 0.45);
        let resolved = resolve_box(2000, 1000, &scene).unwrap();

        assert_eq!(
            resolved.target,
            TargetBox { x: 500, y: 150, width: 700, height: 450 }
        );
        assert_eq!(resolved.style.reserved_fraction(), DEFAULT_RESERVED_FRACTION);
    }

    #[test]
    fn test_region_center_origin() {
        let scene = SceneConfig::Region {
            x: 0.5,
            y: 0.35,
            width: 0.20,
            height: 0.30,
            origin: RegionOrigin::Center,
            reserved_fraction: 0.7,
        };
        let resolved = resolve_box(1000, 1000, &scene).unwrap();

        assert_eq!(
            resolved.target,
            TargetBox { x: 400, y: 200, width: 200, height: 300 }
        );
        assert_eq!(resolved.target.center(), (500, 350));
    }

    #[test]
    fn test_rejects_out_of_range_fractions() {
        let scene = SceneConfig::anchor(1.2, 0.5, 0.2, 0.2);
        assert_eq!(
            resolve_box(100, 100, &scene),
            Err(PlacementError::FractionOutOfRange { field: "anchor_x", value: 1.2 })
        );

        let mut scene = SceneConfig::region(0.1, 0.1, 0.5, 0.5);
        if let SceneConfig::Region { reserved_fraction, .. } = &mut scene {
            *reserved_fraction = 0.0;
        }
        assert!(matches!(
            resolve_box(100, 100, &scene),
            Err(PlacementError::InvalidReservedFraction(_))
        ));
    }

    #[test]
    fn test_rejects_empty_box() {
        let scene = SceneConfig::anchor(0.5, 0.5, 0.001, 0.5);
        assert!(matches!(
            resolve_box(100, 100, &scene),
            Err(PlacementError::EmptyBox { width: 0, .. })
        ));
    }

    #[test]
    fn test_deserialize_tagged_forms() {
        let anchor: SceneConfig = serde_json::from_str(
            r#"{"style": "anchor", "anchor_x": 0.5, "anchor_y": 0.2, "max_width_fraction": 0.2, "max_height_fraction": 0.25}"#,
        )
        .unwrap();
        assert_eq!(anchor, SceneConfig::anchor(0.5, 0.2, 0.2, 0.25));

        let region: SceneConfig = serde_json::from_str(
            r#"{"style": "region", "x": 0.3, "y": 0.2, "width": 0.4, "height": 0.5}"#,
        )
        .unwrap();
        assert_eq!(region, SceneConfig::region(0.3, 0.2, 0.4, 0.5));
    }
}
