//! Mockup generation engine
//!
//! This module contains the core compositing logic:
//! - Mat and frame construction
//! - Shrink-to-fit placement onto scene templates
//! - Multi-size export crops
//! - Template loading and the end-to-end pipeline

pub mod codec;
mod compositor;
mod error;
mod export;
mod frame;
mod pipeline;
mod template;

pub use compositor::{
    fit_within, usable_area, Compositor, EdgePolicy, Mockup, PlacedArtwork, DEFAULT_MAX_OUTPUT_PIXELS,
};
pub use error::{MockupError, MockupResult};
pub use export::{center_crop_rect, export_sizes, ExportedImage};
pub use frame::{build_framed, flatten_onto};
pub use pipeline::{MockupOutput, MockupPipeline};
pub use template::{load_template, TemplateError, TemplateLibrary};
