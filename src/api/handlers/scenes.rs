//! Scene catalog endpoints

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use mockup_framer::domain::SceneConfig;

use crate::api::error::{failure, ErrorResponse};
use crate::AppState;

/// A configured scene as exposed over the API
#[derive(Serialize, ToSchema)]
pub struct SceneInfo {
    pub scene: String,
    pub label: Option<String>,
    pub template: String,
    /// Whether the scene's template image is loaded
    pub template_available: bool,
    pub placement: SceneConfig,
}

/// Response for listing scenes
#[derive(Serialize, ToSchema)]
pub struct ScenesListResponse {
    pub success: bool,
    pub data: Vec<SceneInfo>,
    pub count: usize,
}

/// Response for a single scene
#[derive(Serialize, ToSchema)]
pub struct SceneResponse {
    pub success: bool,
    pub data: SceneInfo,
}

fn scene_info(state: &AppState, scene: &str) -> Option<SceneInfo> {
    let entry = state.pipeline.catalog().get(scene).ok()?;
    Some(SceneInfo {
        scene: scene.to_string(),
        label: entry.label.clone(),
        template: entry.template.clone(),
        template_available: state.pipeline.templates().get(&entry.template).is_ok(),
        placement: entry.placement.clone(),
    })
}

/// GET /api/v1/scenes - List all configured scenes
#[utoipa::path(
    get,
    path = "/api/v1/scenes",
    tag = "scenes",
    responses(
        (status = 200, description = "List of configured scenes", body = ScenesListResponse)
    )
)]
pub async fn list_scenes(state: web::Data<AppState>) -> HttpResponse {
    let data: Vec<SceneInfo> = state
        .pipeline
        .catalog()
        .iter()
        .filter_map(|(name, _)| scene_info(&state, name))
        .collect();
    let count = data.len();

    info!(count = count, "Retrieved scenes list");

    HttpResponse::Ok().json(ScenesListResponse {
        success: true,
        data,
        count,
    })
}

/// GET /api/v1/scenes/{scene} - Get a single scene
#[utoipa::path(
    get,
    path = "/api/v1/scenes/{scene}",
    tag = "scenes",
    params(
        ("scene" = String, Path, description = "Scene key (e.g., 'living_room')")
    ),
    responses(
        (status = 200, description = "Scene details", body = SceneResponse),
        (status = 404, description = "Scene not found", body = ErrorResponse)
    )
)]
pub async fn get_scene(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let scene = path.into_inner();

    match scene_info(&state, &scene) {
        Some(data) => HttpResponse::Ok().json(SceneResponse { success: true, data }),
        None => failure(
            actix_web::http::StatusCode::NOT_FOUND,
            "SCENE_NOT_FOUND",
            format!("Scene '{}' does not exist", scene),
        ),
    }
}
