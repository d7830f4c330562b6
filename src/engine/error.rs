//! Engine error type

use thiserror::Error;

use crate::domain::{CatalogError, PlacementError};

/// Errors surfaced by the compositing engine
#[derive(Debug, Error)]
pub enum MockupError {
    #[error("Invalid artwork: {0}")]
    InvalidArtwork(String),
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
    #[error("Failed to load template '{template}': {reason}")]
    TemplateLoad { template: String, reason: String },
    #[error("Invalid frame spec: {0}")]
    InvalidFrameSpec(String),
    #[error("Invalid scene placement: {0}")]
    InvalidScene(String),
    #[error("Invalid export size: {0}")]
    InvalidExportSize(String),
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl From<CatalogError> for MockupError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownScene(scene) => MockupError::UnknownScene(scene),
            other => MockupError::InvalidScene(other.to_string()),
        }
    }
}

impl From<PlacementError> for MockupError {
    fn from(err: PlacementError) -> Self {
        MockupError::InvalidScene(err.to_string())
    }
}

/// Result type for engine operations
pub type MockupResult<T> = Result<T, MockupError>;
