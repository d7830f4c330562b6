//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::error::{ApiError, ErrorResponse};
use crate::api::handlers::{
    frames::{FrameRequest, FrameResponse},
    generate::{
        Dimensions, ExportLink, FrameOptions, GenerateMetadata, GenerateRequest, GenerateResponse,
    },
    health::HealthResponse,
    scenes::{SceneInfo, SceneResponse, ScenesListResponse},
};
use mockup_framer::domain::{ExportSize, FramePreset, FrameSpec, RegionOrigin, SceneConfig, SceneEntry};
use mockup_framer::engine::codec::OutputFormat;
use mockup_framer::engine::{EdgePolicy, PlacedArtwork};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mockup Framer API",
        version = "1.0.0",
        description = "Frames artwork with a mat and border, places it into room scenes and exports sized crops",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "mockups", description = "Framing and mockup generation endpoints"),
        (name = "scenes", description = "Configured scene catalog")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::generate::generate_mockup,
        crate::api::handlers::frames::frame_artwork,
        crate::api::handlers::scenes::list_scenes,
        crate::api::handlers::scenes::get_scene,
    ),
    components(
        schemas(
            // Health schemas
            HealthResponse,
            // Generate schemas
            GenerateRequest,
            GenerateResponse,
            GenerateMetadata,
            ExportLink,
            FrameOptions,
            Dimensions,
            ErrorResponse,
            ApiError,
            // Frame schemas
            FrameRequest,
            FrameResponse,
            // Scene schemas
            ScenesListResponse,
            SceneResponse,
            SceneInfo,
            // Domain schemas
            SceneEntry,
            SceneConfig,
            RegionOrigin,
            FrameSpec,
            FramePreset,
            ExportSize,
            PlacedArtwork,
            EdgePolicy,
            OutputFormat,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/mockups/generate",
            "/api/v1/frames",
            "/api/v1/scenes",
            "/api/v1/scenes/{scene}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
