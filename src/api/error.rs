//! Error envelope shared by all handlers

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

use mockup_framer::engine::MockupError;

use super::artwork::ArtworkError;

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Build an error response with the standard envelope
pub fn failure(status: StatusCode, code: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message: message.into(),
        },
    })
}

/// Status and code for an engine error
pub fn mockup_error_status(err: &MockupError) -> (StatusCode, &'static str) {
    match err {
        MockupError::InvalidArtwork(_) => (StatusCode::BAD_REQUEST, "INVALID_ARTWORK"),
        MockupError::InvalidFrameSpec(_) => (StatusCode::BAD_REQUEST, "INVALID_FRAME"),
        MockupError::InvalidExportSize(_) => (StatusCode::BAD_REQUEST, "INVALID_EXPORT_SIZE"),
        MockupError::UnknownScene(_) => (StatusCode::NOT_FOUND, "SCENE_NOT_FOUND"),
        MockupError::InvalidScene(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_SCENE"),
        MockupError::TemplateLoad { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_LOAD_FAILED"),
        MockupError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENCODE_FAILED"),
    }
}

pub fn mockup_failure(err: &MockupError) -> HttpResponse {
    let (status, code) = mockup_error_status(err);
    failure(status, code, err.to_string())
}

pub fn artwork_failure(err: &ArtworkError) -> HttpResponse {
    let (status, code) = match err {
        ArtworkError::MissingSource | ArtworkError::Base64(_) | ArtworkError::TooLarge(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_ARTWORK")
        }
        ArtworkError::FetchFailed(_) | ArtworkError::Http(_) => (StatusCode::BAD_GATEWAY, "ARTWORK_FETCH_FAILED"),
        ArtworkError::Engine(inner) => mockup_error_status(inner),
    };
    failure(status, code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            mockup_error_status(&MockupError::UnknownScene("x".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            mockup_error_status(&MockupError::InvalidArtwork("x".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            mockup_error_status(&MockupError::TemplateLoad { template: "t".into(), reason: "r".into() }).1,
            "TEMPLATE_LOAD_FAILED"
        );
    }
}
