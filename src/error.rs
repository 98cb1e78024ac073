use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Immich API error: http status={0}")]
    Status(u16),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Status(code) => {
                tracing::error!("Immich API error: http status={}", code);
                (
                    StatusCode::BAD_GATEWAY,
                    "Photo server returned an error".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (StatusCode::BAD_GATEWAY, "JSON parsing error".to_string())
            }
            AppError::Yaml(e) => {
                tracing::error!("YAML error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration parsing error".to_string(),
                )
            }
            AppError::Image(e) => {
                tracing::error!("Image error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image processing failed".to_string(),
                )
            }
            AppError::Request(e) => {
                tracing::error!("Request error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "External request failed".to_string(),
                )
            }
        };

        let body = Json(json!({ "detail": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
