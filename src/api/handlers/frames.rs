//! Framing endpoint: mat and frame only, no scene

use std::time::Instant;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use mockup_framer::engine::codec::{encode, OutputFormat};
use mockup_framer::engine::MockupError;

use super::generate::{publish, Dimensions, EncodedOutput, FrameOptions};
use crate::api::artwork::{load_artwork, ArtworkSource};
use crate::api::error::{artwork_failure, failure, mockup_failure, ErrorResponse};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct FrameRequest {
    pub artwork_url: Option<String>,
    pub artwork_base64: Option<String>,
    #[serde(default)]
    pub frame: FrameOptions,
    pub format: Option<OutputFormat>,
}

#[derive(Serialize, ToSchema)]
pub struct FrameResponse {
    pub success: bool,
    pub framed_url: String,
    pub dimensions: Dimensions,
    pub generation_time_ms: u64,
}

/// POST /api/v1/frames - Add mat and frame to an artwork
#[utoipa::path(
    post,
    path = "/api/v1/frames",
    tag = "mockups",
    request_body = FrameRequest,
    responses(
        (status = 200, description = "Framed artwork", body = FrameResponse),
        (status = 400, description = "Invalid artwork or frame", body = ErrorResponse),
        (status = 502, description = "Artwork could not be fetched", body = ErrorResponse)
    )
)]
pub async fn frame_artwork(state: web::Data<AppState>, body: web::Json<FrameRequest>) -> HttpResponse {
    let start = Instant::now();
    let body = body.into_inner();

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

    let pipeline = state.pipeline.clone();
    let rendered = web::block(move || {
        let framed = pipeline.frame(&artwork, &frame)?;
        let bytes = encode(&framed, format)?;
        Ok::<_, MockupError>((framed.dimensions(), bytes))
    })
    .await;

    let ((width, height), bytes) = match rendered {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(error = %e, "Framing failed");
            return mockup_failure(&e);
        }
        Err(e) => {
            return failure(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "GENERATION_FAILED",
                e.to_string(),
            )
        }
    };

    let batch = uuid::Uuid::new_v4().simple().to_string();
    let output = EncodedOutput {
        variant: "framed".to_string(),
        bytes,
    };
    let framed_url = match publish(state.store.as_deref(), &batch, "frame", output, format).await {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "Failed to store framed artwork");
            return failure(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILED", e);
        }
    };

    let elapsed = start.elapsed().as_millis() as u64;
    info!(width, height, generation_time_ms = elapsed, "Artwork framed");

    HttpResponse::Ok().json(FrameResponse {
        success: true,
        framed_url,
        dimensions: Dimensions { width, height },
        generation_time_ms: elapsed,
    })
}
