//! Export size definitions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named output size for export crops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExportSize {
    /// Name used to key the output, e.g. "square_1200"
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ExportSize {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        ExportSize {
            name: name.into(),
            width,
            height,
        }
    }

    /// Marketplace sizes produced when a request doesn't name any
    pub fn standard_presets() -> Vec<ExportSize> {
        vec![
            ExportSize::new("square_1200", 1200, 1200),
            ExportSize::new("landscape_1600x1200", 1600, 1200),
            ExportSize::new("hero_1920x1080", 1920, 1080),
            ExportSize::new("thumbnail_800", 800, 800),
        ]
    }
}
