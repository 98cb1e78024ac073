#![cfg(test)]

use crate::app::{create_app, AppState};
use crate::camera::ImmichPhotosCamera;
use crate::config::CameraConfig;
use crate::immich::PhotoLibrary;
use crate::models::{Album, Media, User};
use crate::photos::{ImmichPhotos, PhotosSettings};
use async_trait::async_trait;
use axum_test::TestServer;
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use image::{codecs::jpeg::JpegEncoder, DynamicImage, Rgb, RgbImage};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FAKE_API_KEY: &str = "test-api-key";

/// Encode a solid-colour JPEG of the given size
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, 90))
        .expect("Failed to encode test jpeg");
    buffer
}

/// JPEG carrying an APP1 Exif segment with a single Orientation tag.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    // big-endian TIFF header, one IFD entry: tag 0x0112, SHORT, count 1
    let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, 0x00, 0x01];
    tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    let length = u16::try_from(payload.len() + 2).unwrap();

    let jpeg = jpeg_bytes(width, height);
    let mut tagged = jpeg[..2].to_vec();
    tagged.extend_from_slice(&[0xFF, 0xE1]);
    tagged.extend_from_slice(&length.to_be_bytes());
    tagged.extend_from_slice(&payload);
    tagged.extend_from_slice(&jpeg[2..]);
    tagged
}

pub fn album_json(id: &str, title: &str, shared: bool, count: i64) -> Value {
    json!({
        "id": id,
        "albumName": title,
        "shared": shared,
        "assetCount": count,
        "ownerId": "user-1"
    })
}

/// Asset as Immich returns it. `orientation: None` sends an explicit null.
pub fn asset_json(id: &str, asset_type: &str, orientation: Option<Value>) -> Value {
    let exif = json!({
        "description": "Sunset",
        "exifImageWidth": 4032,
        "exifImageHeight": 3024,
        "make": "Canon",
        "model": "EOS R6",
        "focalLength": 35.0,
        "fNumber": 1.8,
        "iso": 200,
        "exposureTime": "1/250",
        "orientation": orientation.unwrap_or(Value::Null)
    });

    json!({
        "id": id,
        "type": asset_type,
        "originalPath": format!("upload/library/{}.jpg", id),
        "fileCreatedAt": "2023-07-14T18:22:05.000Z",
        "exifInfo": exif
    })
}

pub fn sample_album(id: &str) -> Album {
    Album::from_json(&album_json(id, "Holidays", true, 2))
}

pub fn sample_media(id: &str, orientation: Option<i32>) -> Media {
    Media::from_json(&asset_json(id, "IMAGE", orientation.map(|o| json!(o.to_string()))))
}

fn fake_album_detail(id: &str) -> Option<Value> {
    match id {
        "album-1" => {
            let mut album = album_json("album-1", "Holidays", true, 3);
            album["assets"] = json!([
                asset_json("img-1", "IMAGE", None),
                asset_json("img-2", "IMAGE", Some(json!("6"))),
                asset_json("vid-1", "VIDEO", None),
            ]);
            Some(album)
        }
        "album-2" => {
            let mut album = album_json("album-2", "Archive", false, 0);
            album["assets"] = json!([]);
            Some(album)
        }
        _ => None,
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some(FAKE_API_KEY)
}

#[derive(Deserialize)]
struct AlbumQuery {
    shared: Option<bool>,
}

async fn fake_ping(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "res": "pong" })).into_response()
}

async fn fake_albums(headers: HeaderMap, Query(query): Query<AlbumQuery>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let albums: Vec<Value> = [
        album_json("album-1", "Holidays", true, 3),
        album_json("album-2", "Archive", false, 0),
    ]
    .into_iter()
    .filter(|a| !query.shared.unwrap_or(false) || a["shared"] == json!(true))
    .collect();
    Json(albums).into_response()
}

async fn fake_album(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match fake_album_detail(&id) {
        Some(album) => Json(album).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fake_asset(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "img-1" => Json(asset_json("img-1", "IMAGE", None)).into_response(),
        "img-2" => Json(asset_json("img-2", "IMAGE", Some(json!("6")))).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fake_asset_file(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) || !id.starts_with("img-") {
        return StatusCode::NOT_FOUND.into_response();
    }
    jpeg_bytes(40, 20).into_response()
}

async fn fake_asset_thumbnail(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) || !id.starts_with("img-") {
        return StatusCode::NOT_FOUND.into_response();
    }
    jpeg_bytes(8, 4).into_response()
}

async fn fake_user(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "id": "user-1", "email": "admin@example.com", "name": "Admin" })).into_response()
}

/// Serve a minimal Immich API on an ephemeral port and return its base url
pub async fn spawn_fake_immich() -> String {
    let router = Router::new()
        .route("/api/server-info/ping", get(fake_ping))
        .route("/api/album", get(fake_albums))
        .route("/api/album/:id", get(fake_album))
        .route("/api/asset/:id", get(fake_asset))
        .route("/api/asset/file/:id", get(fake_asset_file))
        .route("/api/asset/thumbnail/:id", get(fake_asset_thumbnail))
        .route("/api/user/me", get(fake_user));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Immich server");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}

/// Base url of a port nothing listens on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}

/// In-memory library handing out albums and media in round-robin order so
/// tests can tell successive picks apart.
pub struct FakeLibrary {
    pub albums: Vec<Album>,
    pub media: Vec<Media>,
    pub content: Mutex<Option<Vec<u8>>>,
    pub reachable: bool,
    pub album_calls: AtomicUsize,
    pub media_calls: AtomicUsize,
    pub content_calls: AtomicUsize,
}

impl FakeLibrary {
    pub fn new(albums: Vec<Album>, media: Vec<Media>, content: Option<Vec<u8>>) -> Self {
        Self {
            albums,
            media,
            content: Mutex::new(content),
            reachable: true,
            album_calls: AtomicUsize::new(0),
            media_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
        }
    }

    /// Two albums and two upright images, served as a 40x20 JPEG
    pub fn with_photos() -> Self {
        Self::new(
            vec![sample_album("album-1"), sample_album("album-2")],
            vec![sample_media("img-1", None), sample_media("img-2", None)],
            Some(jpeg_bytes(40, 20)),
        )
    }

    pub fn set_content(&self, content: Option<Vec<u8>>) {
        *self.content.lock().unwrap() = content;
    }

    pub fn album_calls(&self) -> usize {
        self.album_calls.load(Ordering::SeqCst)
    }

    pub fn media_calls(&self) -> usize {
        self.media_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoLibrary for FakeLibrary {
    async fn ping(&self) -> bool {
        self.reachable
    }

    async fn current_user(&self) -> Option<User> {
        self.reachable.then(|| User {
            id: "user-1".to_string(),
            email: "admin@example.com".to_string(),
            name: Some("Admin".to_string()),
        })
    }

    async fn random_album(&self, _shared: bool) -> Album {
        let n = self.album_calls.fetch_add(1, Ordering::SeqCst);
        if self.albums.is_empty() {
            return Album::default();
        }
        self.albums[n % self.albums.len()].clone()
    }

    async fn random_media(&self, album_id: Option<&str>) -> Media {
        let n = self.media_calls.fetch_add(1, Ordering::SeqCst);
        if album_id.is_none() || self.media.is_empty() {
            return Media::default();
        }
        self.media[n % self.media.len()].clone()
    }

    async fn media_content(&self, _media_id: &str) -> Option<Vec<u8>> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.content.lock().unwrap().clone()
    }
}

/// Shared albums, album kept forever, new photo every minute
pub fn test_settings() -> PhotosSettings {
    PhotosSettings {
        shared: true,
        album_interval: None,
        image_interval: Duration::from_secs(60),
        jpeg_quality: 85,
    }
}

pub fn create_test_camera(library: Arc<FakeLibrary>) -> Arc<ImmichPhotosCamera> {
    let photos = Arc::new(ImmichPhotos::new(library, test_settings()));
    Arc::new(ImmichPhotosCamera::new(photos, &CameraConfig::default()))
}

/// Create a test app backed by an in-memory library
pub fn create_test_app(library: Arc<FakeLibrary>) -> Router {
    let camera = create_test_camera(library.clone());
    create_app(AppState { camera, library })
}

pub fn create_test_server(library: Arc<FakeLibrary>) -> TestServer {
    TestServer::new(create_test_app(library)).expect("Failed to start test server")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_bytes_decodes() {
        let img = image::load_from_memory(&jpeg_bytes(12, 6)).unwrap();
        assert_eq!((img.width(), img.height()), (12, 6));
    }

    #[test]
    fn test_sample_media_is_image() {
        let media = sample_media("img-9", Some(8));
        assert!(media.is_image());
        assert_eq!(media.orientation(), Some(8));
    }

    #[tokio::test]
    async fn test_fake_library_round_robin() {
        let library = FakeLibrary::with_photos();

        let first = library.random_media(Some("album-1")).await;
        let second = library.random_media(Some("album-1")).await;
        assert_ne!(first.id, second.id);
        assert_eq!(library.media_calls(), 2);

        assert!(library.random_media(None).await.is_empty());
    }

    #[test]
    fn test_create_test_app() {
        let _app = create_test_app(Arc::new(FakeLibrary::with_photos()));
    }
}
