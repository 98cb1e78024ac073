use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ImmichConfig;
use crate::constants::{
    ALBUM_PATH, API_KEY_HEADER, ASSET_FILE_PATH, ASSET_PATH, ASSET_THUMBNAIL_PATH,
    CURRENT_USER_PATH, MEDIA_TYPE_IMAGE, PING_PATH,
};
use crate::error::{AppError, AppResult};
use crate::immich::PhotoLibrary;
use crate::models::{Album, Media, PingResponse, User};

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_BINARY: &str = "application/octet-stream";

pub fn pick_random<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}

fn log_failure(e: &AppError) {
    match e {
        AppError::Status(code) => error!("Immich API error: http status={}", code),
        other => error!("Immich API connection error: {}", other),
    }
}

fn or_log<T>(result: AppResult<T>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        log_failure(&e);
        fallback
    })
}

/// Client for the Immich REST API, authenticated with a static API key.
#[derive(Clone)]
pub struct ImmichClient {
    http: Client,
    url: String,
    api_key: String,
}

impl ImmichClient {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &ImmichConfig) -> AppResult<Self> {
        Self::new(
            &config.url,
            &config.api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    async fn send(&self, path: &str, accept: &str) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, accept)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(AppError::Status(response.status().as_u16()));
        }
        Ok(response)
    }

    async fn get_json(&self, path: &str) -> AppResult<Value> {
        Ok(self.send(path, ACCEPT_JSON).await?.json().await?)
    }

    async fn get_bytes(&self, path: &str) -> AppResult<Vec<u8>> {
        Ok(self.send(path, ACCEPT_BINARY).await?.bytes().await?.to_vec())
    }

    /// True when the server answers the ping with `pong`.
    pub async fn ping(&self) -> bool {
        or_log(self.fetch_ping().await, false)
    }

    async fn fetch_ping(&self) -> AppResult<bool> {
        let ping: PingResponse = serde_json::from_value(self.get_json(PING_PATH).await?)?;
        Ok(ping.is_pong())
    }

    pub async fn get_all_albums(&self, shared: bool) -> Vec<Album> {
        let path = if shared {
            format!("{}?shared=true", ALBUM_PATH)
        } else {
            ALBUM_PATH.to_string()
        };

        or_log(self.fetch_albums(&path).await, Vec::new())
    }

    async fn fetch_albums(&self, path: &str) -> AppResult<Vec<Album>> {
        let albums: Vec<Value> = serde_json::from_value(self.get_json(path).await?)?;
        Ok(albums.iter().map(Album::from_json).collect())
    }

    pub async fn get_random_album(&self, shared: bool) -> Album {
        let albums = self.get_all_albums(shared).await;
        pick_random(&albums).unwrap_or_default()
    }

    pub async fn get_album_info(&self, album_id: Option<&str>) -> Album {
        let Some(album_id) = album_id else {
            return Album::default();
        };

        let path = format!("{}/{}", ALBUM_PATH, album_id);
        let result = self.get_json(&path).await.map(|v| Album::from_json(&v));
        or_log(result, Album::default())
    }

    /// Images of an album; videos are skipped.
    pub async fn get_album_media_items(&self, album_id: Option<&str>) -> Vec<Media> {
        let Some(album_id) = album_id else {
            return Vec::new();
        };

        let path = format!("{}/{}", ALBUM_PATH, album_id);
        or_log(self.fetch_album_images(&path).await, Vec::new())
    }

    async fn fetch_album_images(&self, path: &str) -> AppResult<Vec<Media>> {
        let value = self.get_json(path).await?;
        let assets = value
            .get("assets")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::Internal("album has no asset list".to_string()))?;

        Ok(assets
            .iter()
            .filter(|asset| asset.get("type").and_then(Value::as_str) == Some(MEDIA_TYPE_IMAGE))
            .map(Media::from_json)
            .collect())
    }

    pub async fn get_media_info(&self, media_id: Option<&str>) -> Media {
        let Some(media_id) = media_id else {
            return Media::default();
        };

        let path = format!("{}/{}", ASSET_PATH, media_id);
        let result = self.get_json(&path).await.map(|v| Media::from_json(&v));
        or_log(result, Media::default())
    }

    pub async fn get_random_media(&self, album_id: Option<&str>) -> Media {
        if album_id.is_none() {
            return Media::default();
        }

        let media = self.get_album_media_items(album_id).await;
        pick_random(&media).unwrap_or_default()
    }

    pub async fn get_media_content(&self, media_id: &str) -> Option<Vec<u8>> {
        let path = format!("{}/{}", ASSET_FILE_PATH, media_id);
        self.get_bytes(&path).await.map_err(|e| log_failure(&e)).ok()
    }

    pub async fn get_media_thumbnail(&self, media_id: &str) -> Option<Vec<u8>> {
        let path = format!("{}/{}", ASSET_THUMBNAIL_PATH, media_id);
        self.get_bytes(&path).await.map_err(|e| log_failure(&e)).ok()
    }

    pub async fn get_current_user(&self) -> Option<User> {
        self.fetch_current_user().await.map_err(|e| log_failure(&e)).ok()
    }

    async fn fetch_current_user(&self) -> AppResult<User> {
        Ok(serde_json::from_value(self.get_json(CURRENT_USER_PATH).await?)?)
    }
}

#[async_trait]
impl PhotoLibrary for ImmichClient {
    async fn ping(&self) -> bool {
        ImmichClient::ping(self).await
    }

    async fn current_user(&self) -> Option<User> {
        self.get_current_user().await
    }

    async fn random_album(&self, shared: bool) -> Album {
        self.get_random_album(shared).await
    }

    async fn random_media(&self, album_id: Option<&str>) -> Media {
        self.get_random_media(album_id).await
    }

    async fn media_content(&self, media_id: &str) -> Option<Vec<u8>> {
        self.get_media_content(media_id).await
    }
}
