//! Scene catalog: the immutable scene-name -> placement table
//!
//! Loaded once (usually from `config/scenes.toml`) and passed explicitly to
//! whatever needs to resolve a scene. Entries are validated on construction,
//! so a catalog never holds an unusable placement.

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use utoipa::ToSchema;

use super::scene::{resolve_box, PlacementError, ResolvedPlacement, SceneConfig};

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
    #[error("Invalid placement for scene '{scene}': {source}")]
    InvalidScene {
        scene: String,
        #[source]
        source: PlacementError,
    },
    #[error("Failed to load scene catalog: {0}")]
    Load(#[from] ConfigError),
}

/// One configured scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SceneEntry {
    /// Human readable name, e.g. "Living Room (Above Sofa)"
    #[serde(default)]
    pub label: Option<String>,
    /// Template file name inside the templates directory
    pub template: String,
    pub placement: SceneConfig,
}

#[derive(Debug, Deserialize)]
struct SceneCatalogFile {
    #[serde(default)]
    scenes: BTreeMap<String, SceneEntry>,
}

/// Immutable, validated scene table
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    scenes: BTreeMap<String, SceneEntry>,
}

impl SceneCatalog {
    /// Build a catalog, validating every placement
    pub fn new(scenes: BTreeMap<String, SceneEntry>) -> Result<Self, CatalogError> {
        for (name, entry) in &scenes {
            entry
                .placement
                .validate()
                .map_err(|source| CatalogError::InvalidScene {
                    scene: name.clone(),
                    source,
                })?;
        }
        Ok(SceneCatalog { scenes })
    }

    /// Load a catalog from a TOML or JSON file (format chosen by extension)
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file: SceneCatalogFile = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        let catalog = SceneCatalog::new(file.scenes)?;
        info!(
            path = %path.display(),
            scenes = catalog.len(),
            "Loaded scene catalog"
        );
        Ok(catalog)
    }

    pub fn get(&self, scene: &str) -> Result<&SceneEntry, CatalogError> {
        self.scenes
            .get(scene)
            .ok_or_else(|| CatalogError::UnknownScene(scene.to_string()))
    }

    /// Resolve a scene against concrete template dimensions
    pub fn resolve(
        &self,
        scene: &str,
        template_width: u32,
        template_height: u32,
    ) -> Result<ResolvedPlacement, CatalogError> {
        let entry = self.get(scene)?;
        resolve_box(template_width, template_height, &entry.placement).map_err(|source| {
            CatalogError::InvalidScene {
                scene: scene.to_string(),
                source,
            }
        })
    }

    /// Scene whose entry uses the given template file, if any
    pub fn scene_for_template(&self, template: &str) -> Option<&str> {
        self.scenes
            .iter()
            .find(|(_, entry)| entry.template == template)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SceneEntry)> {
        self.scenes.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
