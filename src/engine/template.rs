//! Template loading and management
//!
//! Scene templates are background rasters keyed by file name. They are
//! decoded once and shared read-only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageError, RgbImage};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use super::error::MockupError;

const TEMPLATE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Template-related errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Failed to decode template image: {0}")]
    ImageLoad(#[from] ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template loading task failed: {0}")]
    Task(String),
}

impl From<TemplateError> for MockupError {
    fn from(err: TemplateError) -> Self {
        let template = match &err {
            TemplateError::NotFound(name) => name.clone(),
            _ => String::new(),
        };
        MockupError::TemplateLoad {
            template,
            reason: err.to_string(),
        }
    }
}

/// Decode a single template file to an opaque raster
pub fn load_template(path: &Path) -> Result<RgbImage, TemplateError> {
    if !path.is_file() {
        return Err(TemplateError::NotFound(path.display().to_string()));
    }
    Ok(image::open(path)?.to_rgb8())
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEMPLATE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Manages all templates in memory
pub struct TemplateLibrary {
    templates: RwLock<HashMap<String, Arc<RgbImage>>>,
    base_path: PathBuf,
}

impl TemplateLibrary {
    /// Create an empty library rooted at `base_path`
    pub fn new(base_path: &Path) -> Self {
        TemplateLibrary {
            templates: RwLock::new(HashMap::new()),
            base_path: base_path.to_path_buf(),
        }
    }

    /// Library over already-decoded templates
    pub fn from_images<I>(images: I) -> Self
    where
        I: IntoIterator<Item = (String, RgbImage)>,
    {
        let templates = images
            .into_iter()
            .map(|(name, image)| (name, Arc::new(image)))
            .collect();

        TemplateLibrary {
            templates: RwLock::new(templates),
            base_path: PathBuf::new(),
        }
    }

    /// Decode every template image in the base directory
    pub async fn load_all(&self) -> Result<(), TemplateError> {
        let base_path = self.base_path.clone();

        // Spawn blocking task for file I/O and decoding
        let templates = tokio::task::spawn_blocking(move || Self::scan(&base_path))
            .await
            .map_err(|e| TemplateError::Task(e.to_string()))??;

        *self.templates.write() = templates;
        Ok(())
    }

    fn scan(base_path: &Path) -> Result<HashMap<String, Arc<RgbImage>>, TemplateError> {
        let mut loaded = HashMap::new();

        if !base_path.exists() {
            warn!("Templates directory does not exist: {}", base_path.display());
            return Ok(loaded);
        }

        for entry in std::fs::read_dir(base_path)? {
            let path = entry?.path();
            if !path.is_file() || !is_template_file(&path) {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
                continue;
            };

            match load_template(&path) {
                Ok(image) => {
                    info!(
                        template = %name,
                        width = image.width(),
                        height = image.height(),
                        "Loaded template"
                    );
                    loaded.insert(name, Arc::new(image));
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load template"
                    );
                }
            }
        }

        Ok(loaded)
    }

    /// Get a template by file name
    pub fn get(&self, name: &str) -> Result<Arc<RgbImage>, TemplateError> {
        self.templates
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Get the number of loaded templates
    pub fn template_count(&self) -> usize {
        self.templates.read().len()
    }

    /// List all template names
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_missing_template_maps_to_template_load() {
        let library = TemplateLibrary::from_images(Vec::new());
        let err: MockupError = library.get("gallery.jpg").unwrap_err().into();
        assert!(matches!(err, MockupError::TemplateLoad { template, .. } if template == "gallery.jpg"));
    }

    #[test]
    fn test_load_all_reads_image_files_only() {
        let dir = std::env::temp_dir().join(format!("templates-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        RgbImage::from_pixel(30, 20, Rgb([1, 2, 3])).save(dir.join("office.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a template").unwrap();
        std::fs::write(dir.join("broken.png"), "not a png").unwrap();

        let library = TemplateLibrary::new(&dir);
        tokio_test::block_on(library.load_all()).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(library.list_names(), vec!["office.png".to_string()]);
        let office = library.get("office.png").unwrap();
        assert_eq!(office.dimensions(), (30, 20));
        assert_eq!(*office.get_pixel(0, 0), Rgb([1, 2, 3]));
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let library = TemplateLibrary::new(Path::new("/nonexistent/mockup/templates"));
        tokio_test::block_on(library.load_all()).unwrap();
        assert_eq!(library.template_count(), 0);
    }

    #[test]
    fn test_load_template_missing_file() {
        assert!(matches!(
            load_template(Path::new("/nonexistent/living_room.jpg")),
            Err(TemplateError::NotFound(_))
        ));
    }
}
