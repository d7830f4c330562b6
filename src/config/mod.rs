//! Configuration module for the mockup service

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;

use crate::domain::FrameSpec;
use crate::engine::codec::OutputFormat;
use crate::engine::{Compositor, EdgePolicy, DEFAULT_MAX_OUTPUT_PIXELS};

/// Main application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub templates: TemplateSettings,
    pub scenes: SceneSettings,
    /// Frame used when a request doesn't specify one
    pub frame: FrameSpec,
    pub compositor: CompositorSettings,
    pub fetch: FetchSettings,
    pub storage: StorageSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Template configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub path: PathBuf,
}

/// Scene catalog location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub path: PathBuf,
}

/// Compositing policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    pub edge_policy: EdgePolicy,
    pub output_format: OutputFormat,
    /// Largest framed raster or export, in pixels
    pub max_output_pixels: u64,
}

/// Artwork download limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub max_artwork_bytes: usize,
}

/// Where generated mockups are stored; unset means results are returned inline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub output_path: Option<PathBuf>,
    pub public_base_url: Option<String>,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with MOCKUP__)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local overrides (gitignored)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment variables (MOCKUP__SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("MOCKUP")
                    .separator("__")
                    .try_parsing(true)
            );

        builder.build()?.try_deserialize()
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        TemplateSettings {
            path: PathBuf::from("assets/templates"),
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        SceneSettings {
            path: PathBuf::from("config/scenes.toml"),
        }
    }
}

impl Default for CompositorSettings {
    fn default() -> Self {
        CompositorSettings {
            edge_policy: EdgePolicy::default(),
            output_format: OutputFormat::default(),
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }
}

impl CompositorSettings {
    /// Compositor configured from these settings
    pub fn compositor(&self) -> Compositor {
        Compositor::new(self.edge_policy).with_max_output_pixels(self.max_output_pixels)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout_secs: 30,
            max_artwork_bytes: 50 * 1024 * 1024,
        }
    }
}
