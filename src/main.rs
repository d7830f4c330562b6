//! Mockup Framer
//!
//! HTTP service that frames artwork with a mat and border, places it into
//! room-scene templates and exports marketplace-sized crops.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use mockup_framer::config::Settings;
use mockup_framer::domain::SceneCatalog;
use mockup_framer::engine::{MockupPipeline, TemplateLibrary};
use mockup_framer::storage::{LocalStore, MockupStore};

mod api;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub pipeline: Arc<MockupPipeline>,
    pub http_client: reqwest::Client,
    /// Unset means results are returned inline as data URLs
    pub store: Option<Arc<dyn MockupStore>>,
    pub started_at: Instant,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mockup_framer=info".parse()?)
                .add_directive("actix_web=info".parse()?),
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = settings.bind_addr();

    info!(
        "Starting Mockup Framer v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    let catalog = SceneCatalog::load(&settings.scenes.path)
        .with_context(|| format!("Failed to load scenes from {}", settings.scenes.path.display()))?;

    // Load all templates into memory at startup
    let templates = TemplateLibrary::new(&settings.templates.path);
    templates.load_all().await.context("Failed to load templates")?;
    info!(
        templates = templates.template_count(),
        scenes = catalog.len(),
        "Loaded templates and scenes"
    );

    for (scene, entry) in catalog.iter() {
        if templates.get(&entry.template).is_err() {
            warn!(scene = %scene, template = %entry.template, "Scene template is missing");
        }
    }

    let pipeline = Arc::new(MockupPipeline::new(
        Arc::new(catalog),
        Arc::new(templates),
        settings.compositor.compositor(),
    ));

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.fetch.timeout_secs))
        .user_agent(concat!("mockup-framer/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let store: Option<Arc<dyn MockupStore>> = match &settings.storage.output_path {
        Some(path) => {
            info!(path = %path.display(), "Storing mockups on local disk");
            Some(Arc::new(LocalStore::new(path, settings.storage.public_base_url.clone())))
        }
        None => {
            info!("No storage output_path configured, returning mockups inline");
            None
        }
    };

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);

    let app_state = web::Data::new(AppState {
        settings,
        pipeline,
        http_client,
        store,
        started_at: Instant::now(),
    });

    // Configure and start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::JsonConfig::default().limit(64 * 1024 * 1024))
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "mockup-framer"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION"))),
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod test_support {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Instant;

    use actix_web::web;
    use image::{Rgb, RgbImage};

    use mockup_framer::config::Settings;
    use mockup_framer::domain::{SceneCatalog, SceneConfig, SceneEntry};
    use mockup_framer::engine::{MockupPipeline, TemplateLibrary};

    use crate::AppState;

    /// One anchor scene over a 400x300 template, no store
    pub fn test_state() -> web::Data<AppState> {
        let mut scenes = BTreeMap::new();
        scenes.insert(
            "living_room".to_string(),
            SceneEntry {
                label: Some("Living Room".to_string()),
                template: "living_room.jpg".to_string(),
                placement: SceneConfig::anchor(0.5, 0.2, 0.2, 0.25),
            },
        );
        let catalog = SceneCatalog::new(scenes).unwrap();
        let templates = TemplateLibrary::from_images([(
            "living_room.jpg".to_string(),
            RgbImage::from_pixel(400, 300, Rgb([200, 190, 180])),
        )]);

        let settings = Settings::default();
        let compositor = settings.compositor.compositor();

        web::Data::new(AppState {
            settings,
            pipeline: Arc::new(MockupPipeline::new(Arc::new(catalog), Arc::new(templates), compositor)),
            http_client: reqwest::Client::new(),
            store: None,
            started_at: Instant::now(),
        })
    }
}
