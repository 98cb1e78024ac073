use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::immich::PhotoLibrary;
use crate::models::{Album, Media};
use crate::processor::process_image;

#[derive(Debug, Clone)]
pub struct PhotosSettings {
    pub shared: bool,
    pub album_interval: Option<Duration>,
    pub image_interval: Duration,
    pub jpeg_quality: u8,
}

impl From<&Config> for PhotosSettings {
    fn from(config: &Config) -> Self {
        Self {
            shared: config.immich.shared_albums,
            album_interval: config.update_interval.album_interval(),
            image_interval: config.update_interval.image_interval(),
            jpeg_quality: config.camera.jpeg_quality,
        }
    }
}

type StillSize = (Option<u32>, Option<u32>);

#[derive(Default)]
struct PhotosState {
    album: Album,
    media: Media,
    /// Original bytes of the current photo, keyed by media id.
    download: Option<(String, Vec<u8>)>,
    still: Option<(StillSize, Vec<u8>)>,
    album_updated: Option<Instant>,
    media_updated: Option<Instant>,
}

fn elapsed(last: Option<Instant>, interval: Duration, now: Instant) -> bool {
    match last {
        Some(last) => now.duration_since(last) > interval,
        None => true,
    }
}

/// Keeps the current album and photo and decides when each is replaced.
pub struct ImmichPhotos {
    library: Arc<dyn PhotoLibrary>,
    settings: PhotosSettings,
    state: Mutex<PhotosState>,
}

impl ImmichPhotos {
    pub fn new(library: Arc<dyn PhotoLibrary>, settings: PhotosSettings) -> Self {
        Self {
            library,
            settings,
            state: Mutex::new(PhotosState::default()),
        }
    }

    pub async fn album(&self) -> Album {
        self.state.lock().await.album.clone()
    }

    pub async fn media(&self) -> Media {
        self.state.lock().await.media.clone()
    }

    /// Current album and photo, read together.
    pub async fn snapshot(&self) -> (Album, Media) {
        let state = self.state.lock().await;
        (state.album.clone(), state.media.clone())
    }

    /// Replaces the current album with a random one.
    pub async fn get_next_album(&self) {
        let mut state = self.state.lock().await;
        self.next_album(&mut state).await;
    }

    /// Replaces the current photo with a random image of the current album,
    /// picking an album first when there is none.
    pub async fn get_next_media(&self) {
        let mut state = self.state.lock().await;
        self.next_media(&mut state).await;
    }

    /// Downloads `media_id` (default: the current photo) and, for images,
    /// rotates it upright and fits it into the requested size.
    pub async fn get_media_content(
        &self,
        width: Option<u32>,
        height: Option<u32>,
        media_id: Option<&str>,
    ) -> Option<Vec<u8>> {
        let state = self.state.lock().await;
        let media_id = media_id.or(state.media.id.as_deref())?.to_string();
        let bytes = self.library.media_content(&media_id).await?;
        Some(self.render(&state.media, &media_id, bytes, (width, height)).await)
    }

    /// Advances album and photo when their intervals have elapsed and returns
    /// the still for the current photo. The original is downloaded once per
    /// photo; a new size only re-processes it.
    pub async fn refresh(&self, width: Option<u32>, height: Option<u32>) -> Option<Vec<u8>> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let album_due = state.album.is_empty()
            || match self.settings.album_interval {
                Some(interval) => elapsed(state.album_updated, interval, now),
                None => false,
            };
        if album_due {
            self.next_album(&mut state).await;
        }

        let media_due = album_due
            || state.media.is_empty()
            || elapsed(state.media_updated, self.settings.image_interval, now);
        if media_due && !state.album.is_empty() {
            self.next_media(&mut state).await;
        }

        let size = (width, height);
        if let Some((cached_size, still)) = &state.still {
            if *cached_size == size {
                return Some(still.clone());
            }
        }

        let media_id = state.media.id.clone()?;
        let cached = match &state.download {
            Some((id, bytes)) if *id == media_id => Some(bytes.clone()),
            _ => None,
        };
        let bytes = match cached {
            Some(bytes) => bytes,
            None => {
                let bytes = self.library.media_content(&media_id).await?;
                state.download = Some((media_id.clone(), bytes.clone()));
                bytes
            }
        };

        let still = self.render(&state.media, &media_id, bytes, size).await;
        state.still = Some((size, still.clone()));
        Some(still)
    }

    async fn next_album(&self, state: &mut PhotosState) {
        state.album = self.library.random_album(self.settings.shared).await;
        state.album_updated = Some(Instant::now());

        if state.album.is_empty() {
            warn!("No album available");
        } else {
            info!("Showing album {}", state.album.title.as_deref().unwrap_or_default());
        }
    }

    async fn next_media(&self, state: &mut PhotosState) {
        if state.album.is_empty() {
            self.next_album(state).await;
        }
        if state.album.is_empty() {
            return;
        }

        state.media = self.library.random_media(state.album.id.as_deref()).await;
        state.media_updated = Some(Instant::now());
        state.download = None;
        state.still = None;

        if state.media.is_empty() {
            warn!("Album {:?} has no images", state.album.id);
        }
    }

    /// Rotates and resizes images; anything else, or anything that fails to
    /// process, is returned as downloaded.
    async fn render(
        &self,
        current: &Media,
        media_id: &str,
        bytes: Vec<u8>,
        (width, height): StillSize,
    ) -> Vec<u8> {
        if !current.is_image() {
            return bytes;
        }

        let orientation = current.orientation();
        let quality = self.settings.jpeg_quality;
        let raw = bytes.clone();
        let processed = tokio::task::spawn_blocking(move || {
            process_image(&raw, orientation, width, height, quality)
        })
        .await;

        match processed {
            Ok(Ok(still)) => still,
            Ok(Err(e)) => {
                error!("Unable to rotate media: {}, {}", e, media_id);
                bytes
            }
            Err(e) => {
                error!("Unable to rotate media: {}, {}", e, media_id);
                bytes
            }
        }
    }
}
