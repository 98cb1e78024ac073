use once_cell::sync::Lazy;
use std::path::PathBuf;

pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("IMMICH_PHOTOS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/data"))
});

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("IMMICH_PHOTOS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| DATA_DIR.join("config.yaml"))
});

pub const API_KEY_HEADER: &str = "x-api-key";

pub const PING_PATH: &str = "/api/server-info/ping";
pub const ALBUM_PATH: &str = "/api/album";
pub const ASSET_PATH: &str = "/api/asset";
pub const ASSET_FILE_PATH: &str = "/api/asset/file";
pub const ASSET_THUMBNAIL_PATH: &str = "/api/asset/thumbnail";
pub const CURRENT_USER_PATH: &str = "/api/user/me";

pub const MEDIA_TYPE_IMAGE: &str = "IMAGE";
pub const MEDIA_TYPE_VIDEO: &str = "VIDEO";

// EXIF orientation codes
pub const ORIENTATION_NORMAL: i32 = 1;
pub const ORIENTATION_UPSIDE_DOWN: i32 = 3;
pub const ORIENTATION_TOP_TO_LEFT: i32 = 6;
pub const ORIENTATION_TOP_TO_RIGHT: i32 = 8;

pub const DEFAULT_RESIZE_WIDTH: u32 = 1024;
pub const DEFAULT_RESIZE_HEIGHT: u32 = 512;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

pub const DEFAULT_IMAGE_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_FRAME_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub const CAMERA_NAME: &str = "Immich Photos";
pub const CAMERA_UNIQUE_ID: &str = "immich_photos";
pub const CAMERA_ICON: &str = "mdi:image";
