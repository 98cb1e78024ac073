use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::config::CameraConfig;
use crate::constants::CAMERA_ICON;
use crate::photos::ImmichPhotos;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub name: String,
    pub unique_id: String,
    pub icon: String,
    pub frame_interval: u64,
    pub is_on: bool,
    pub is_recording: bool,
    pub is_streaming: bool,
    pub extra_state_attributes: BTreeMap<String, String>,
}

/// The still-image camera entity backed by a random Immich photo.
pub struct ImmichPhotosCamera {
    photos: Arc<ImmichPhotos>,
    name: String,
    unique_id: String,
    frame_interval: u64,
}

impl ImmichPhotosCamera {
    pub fn new(photos: Arc<ImmichPhotos>, config: &CameraConfig) -> Self {
        Self {
            photos,
            name: config.name.clone(),
            unique_id: config.unique_id.clone(),
            frame_interval: config.frame_interval,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(self.frame_interval)
    }

    /// Still image for the entity, refreshing album and photo when due.
    pub async fn camera_image(&self, width: Option<u32>, height: Option<u32>) -> Option<Vec<u8>> {
        self.photos.refresh(width, height).await
    }

    pub async fn update(&self) {
        self.photos.refresh(None, None).await;
    }

    pub async fn state(&self) -> CameraState {
        let (album, media) = self.photos.snapshot().await;
        let metadata = media.metadata.unwrap_or_default();

        let attributes = [
            ("album_id", album.id),
            ("album_title", album.title),
            ("media_id", media.id),
            ("filename", media.filename),
            ("description", media.description),
            ("creation_time", metadata.creation_time),
            ("camera_make", metadata.camera_make),
            ("camera_model", metadata.camera_model),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();

        CameraState {
            name: self.name.clone(),
            unique_id: self.unique_id.clone(),
            icon: CAMERA_ICON.to_string(),
            frame_interval: self.frame_interval,
            is_on: true,
            is_recording: false,
            is_streaming: false,
            extra_state_attributes: attributes,
        }
    }
}

/// Refreshes the camera every frame interval until the task is aborted.
pub fn spawn_refresh_loop(camera: Arc<ImmichPhotosCamera>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(camera.frame_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            debug!("Refreshing {}", camera.unique_id);
            camera.update().await;
        }
    })
}
