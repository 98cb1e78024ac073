use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::camera::CameraState;
use crate::error::{AppError, AppResult};
use crate::models::ServerStatusResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/camera", get(get_camera_state))
        .route("/camera/image", get(get_camera_image))
        .route("/camera/update", post(update_camera))
        .route("/camera/server", get(get_server_status))
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    width: Option<u32>,
    height: Option<u32>,
}

fn content_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

async fn get_camera_state(State(state): State<AppState>) -> Json<CameraState> {
    Json(state.camera.state().await)
}

async fn get_camera_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> AppResult<Response> {
    let bytes = state
        .camera
        .camera_image(query.width, query.height)
        .await
        .ok_or_else(|| AppError::Unavailable("No image available".to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&bytes))
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

async fn update_camera(State(state): State<AppState>) -> Json<CameraState> {
    state.camera.update().await;
    Json(state.camera.state().await)
}

async fn get_server_status(State(state): State<AppState>) -> Json<ServerStatusResponse> {
    let reachable = state.library.ping().await;
    let user = if reachable {
        state.library.current_user().await
    } else {
        None
    };

    Json(ServerStatusResponse { reachable, user })
}
