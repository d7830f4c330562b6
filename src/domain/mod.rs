//! Domain types and models

mod export;
mod frame;
mod scene;
mod scene_catalog;

pub use export::ExportSize;
pub use frame::{
    ColorError, FramePreset, FrameSpec, RgbColor, DEFAULT_FRAME_WIDTH_PX, DEFAULT_MAT_WIDTH_FRACTION,
};
pub use scene::{
    resolve_box, PlacementError, PlacementStyle, RegionOrigin, ResolvedPlacement, SceneConfig,
    TargetBox, DEFAULT_RESERVED_FRACTION,
};
pub use scene_catalog::{CatalogError, SceneCatalog, SceneEntry};
