mod camera;

use crate::app::AppState;
use axum::Router;

pub fn api_router() -> Router<AppState> {
    Router::new().merge(camera::router())
}
