//! Mockup generation endpoint

use std::time::Instant;

use actix_web::{web, HttpResponse};
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use mockup_framer::domain::{ExportSize, FramePreset, FrameSpec, RgbColor};
use mockup_framer::engine::codec::{encode, OutputFormat};
use mockup_framer::engine::{MockupOutput, PlacedArtwork};
use mockup_framer::storage::{generated_key, MockupStore};

use crate::api::artwork::{load_artwork, ArtworkSource};
use crate::api::error::{artwork_failure, failure, mockup_failure, ErrorResponse};
use crate::AppState;

/// Frame overrides; anything unset falls back to the configured default frame
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct FrameOptions {
    /// Named frame finish (sets the frame color)
    pub preset: Option<FramePreset>,
    /// Mat width as a fraction of artwork width, in [0, 1)
    pub mat_width_fraction: Option<f64>,
    /// Frame thickness in pixels
    pub frame_width_px: Option<u32>,
    #[schema(value_type = Option<String>, example = "#FFFFFF")]
    pub mat_color: Option<RgbColor>,
    #[schema(value_type = Option<String>, example = "#000000")]
    pub frame_color: Option<RgbColor>,
}

impl FrameOptions {
    /// Layer these options over `base`: preset first, explicit colors last
    pub fn apply(&self, base: &FrameSpec) -> FrameSpec {
        let mut spec = base.clone();
        if let Some(preset) = self.preset {
            spec = spec.with_preset(preset);
        }
        if let Some(fraction) = self.mat_width_fraction {
            spec.mat_width_fraction = fraction;
        }
        if let Some(width) = self.frame_width_px {
            spec.frame_width_px = width;
        }
        if let Some(color) = self.mat_color {
            spec.mat_color = color;
        }
        if let Some(color) = self.frame_color {
            spec.frame_color = color;
        }
        spec
    }
}

/// Request body for mockup generation
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// URL of the artwork image
    pub artwork_url: Option<String>,
    /// Base64 (or data URL) artwork, alternative to `artwork_url`
    pub artwork_base64: Option<String>,
    /// Scene key (e.g., "living_room")
    pub scene: String,
    #[serde(default)]
    pub frame: FrameOptions,
    /// Export crops to produce from the finished mockup
    #[serde(default)]
    pub exports: Vec<ExportSize>,
    /// Also produce the standard marketplace sizes
    #[serde(default)]
    pub standard_exports: bool,
    /// Output encoding, defaults to the configured format
    pub format: Option<OutputFormat>,
}

/// Response for successful mockup generation
#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    pub mockup_url: String,
    pub exports: Vec<ExportLink>,
    pub metadata: GenerateMetadata,
}

/// One exported size
#[derive(Serialize, ToSchema)]
pub struct ExportLink {
    pub name: String,
    pub url: String,
    pub dimensions: Dimensions,
}

/// Metadata about the generation
#[derive(Serialize, ToSchema)]
pub struct GenerateMetadata {
    pub generation_time_ms: u64,
    pub scene: String,
    pub template_used: String,
    pub dimensions: Dimensions,
    pub framed_dimensions: Dimensions,
    pub placement: PlacedArtwork,
}

#[derive(Serialize, ToSchema)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An encoded output waiting to be stored or inlined
pub(crate) struct EncodedOutput {
    pub variant: String,
    pub bytes: Vec<u8>,
}

/// Store an encoded image, or inline it as a data URL when no store is configured
pub(crate) async fn publish(
    store: Option<&dyn MockupStore>,
    batch: &str,
    scene: &str,
    output: EncodedOutput,
    format: OutputFormat,
) -> Result<String, String> {
    match store {
        Some(store) => {
            let key = generated_key(batch, scene, &output.variant, format.extension());
            store
                .put(&key, Bytes::from(output.bytes), format.content_type())
                .await
                .map(|stored| stored.url)
                .map_err(|e| e.to_string())
        }
        None => Ok(format!(
            "data:{};base64,{}",
            format.content_type(),
            base64::engine::general_purpose::STANDARD.encode(&output.bytes)
        )),
    }
}

/// POST /api/v1/mockups/generate - Generate a mockup
#[utoipa::path(
    post,
    path = "/api/v1/mockups/generate",
    tag = "mockups",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Mockup generated successfully", body = GenerateResponse),
        (status = 400, description = "Invalid artwork, frame or export size", body = ErrorResponse),
        (status = 404, description = "Scene not found", body = ErrorResponse),
        (status = 502, description = "Artwork could not be fetched", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_mockup(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> HttpResponse {
    let start = Instant::now();
    let body = body.into_inner();

    info!(
        scene = %body.scene,
        artwork_url = ?body.artwork_url,
        "Processing mockup generation request"
    );

    // Fail fast on unknown scenes before downloading anything
    if state.pipeline.catalog().get(&body.scene).is_err() {
        error!(scene = %body.scene, "Scene not found");
        return failure(
            actix_web::http::StatusCode::NOT_FOUND,
            "SCENE_NOT_FOUND",
            format!("Scene '{}' does not exist", body.scene),
        );
    }

    let source = match ArtworkSource::from_fields(body.artwork_url.as_deref(), body.artwork_base64.as_deref()) {
        Ok(source) => source,
        Err(e) => return artwork_failure(&e),
    };

    let artwork = match load_artwork(&state.http_client, source, state.settings.fetch.max_artwork_bytes).await {
        Ok(artwork) => artwork,
        Err(e) => {
            error!(error = %e, "Failed to load artwork");
            return artwork_failure(&e);
        }
    };

    let frame = body.frame.apply(&state.settings.frame);
    let format = body.format.unwrap_or(state.settings.compositor.output_format);
    let mut exports = body.exports;
    if body.standard_exports {
        exports.extend(ExportSize::standard_presets());
    }

    // Compositing is CPU-bound; keep it off the async workers
    let pipeline = state.pipeline.clone();
    let scene = body.scene.clone();
    let rendered = web::block(move || {
        let output = pipeline.generate(&artwork, &scene, &frame, &exports)?;
        let mut encoded = vec![EncodedOutput {
            variant: "mockup".to_string(),
            bytes: encode(&output.mockup.image, format)?,
        }];
        for export in &output.exports {
            encoded.push(EncodedOutput {
                variant: export.name.clone(),
                bytes: encode(&export.image, format)?,
            });
        }
        Ok::<_, mockup_framer::engine::MockupError>((output, encoded))
    })
    .await;

    let (output, encoded) = match rendered {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(error = %e, scene = %body.scene, "Mockup generation failed");
            return mockup_failure(&e);
        }
        Err(e) => {
            error!(error = %e, "Mockup generation task failed");
            return failure(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "GENERATION_FAILED",
                e.to_string(),
            );
        }
    };

    let batch = uuid::Uuid::new_v4().simple().to_string();
    let mut urls = Vec::with_capacity(encoded.len());
    for item in encoded {
        match publish(state.store.as_deref(), &batch, &body.scene, item, format).await {
            Ok(url) => urls.push(url),
            Err(e) => {
                error!(error = %e, "Failed to store mockup");
                return failure(
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_FAILED",
                    e,
                );
            }
        }
    }

    let elapsed = start.elapsed().as_millis() as u64;
    info!(
        scene = %body.scene,
        generation_time_ms = elapsed,
        exports = output.exports.len(),
        "Mockup generated successfully"
    );

    HttpResponse::Ok().json(build_response(output, urls, elapsed))
}

fn build_response(output: MockupOutput, urls: Vec<String>, elapsed: u64) -> GenerateResponse {
    let mut urls = urls.into_iter();
    let mockup_url = urls.next().unwrap_or_default();

    let exports = output
        .exports
        .iter()
        .zip(urls)
        .map(|(export, url)| ExportLink {
            name: export.name.clone(),
            url,
            dimensions: Dimensions {
                width: export.image.width(),
                height: export.image.height(),
            },
        })
        .collect();

    GenerateResponse {
        success: true,
        mockup_url,
        exports,
        metadata: GenerateMetadata {
            generation_time_ms: elapsed,
            scene: output.scene,
            template_used: output.template,
            dimensions: Dimensions {
                width: output.mockup.image.width(),
                height: output.mockup.image.height(),
            },
            framed_dimensions: Dimensions {
                width: output.framed_width,
                height: output.framed_height,
            },
            placement: output.mockup.placed,
        },
    }
}
