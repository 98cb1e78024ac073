use crate::constants::{
    CAMERA_NAME, CAMERA_UNIQUE_ID, DEFAULT_FRAME_INTERVAL_SECONDS, DEFAULT_IMAGE_INTERVAL_SECONDS,
    DEFAULT_JPEG_QUALITY, DEFAULT_REQUEST_TIMEOUT_SECONDS,
};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmichConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_shared_albums")]
    pub shared_albums: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_shared_albums() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl Default for ImmichConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            shared_albums: default_shared_albums(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Refresh gates, in seconds. Without an album interval the first album
/// picked is kept for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateIntervalConfig {
    #[serde(default)]
    pub album: Option<u64>,
    #[serde(default = "default_image_interval")]
    pub image: u64,
}

fn default_image_interval() -> u64 {
    DEFAULT_IMAGE_INTERVAL_SECONDS
}

impl Default for UpdateIntervalConfig {
    fn default() -> Self {
        Self {
            album: None,
            image: default_image_interval(),
        }
    }
}

impl UpdateIntervalConfig {
    pub fn album_interval(&self) -> Option<Duration> {
        self.album.map(Duration::from_secs)
    }

    pub fn image_interval(&self) -> Duration {
        Duration::from_secs(self.image)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_name")]
    pub name: String,
    #[serde(default = "default_unique_id")]
    pub unique_id: String,
    #[serde(default = "default_frame_interval")]
    pub frame_interval: u64,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_camera_name() -> String {
    CAMERA_NAME.to_string()
}

fn default_unique_id() -> String {
    CAMERA_UNIQUE_ID.to_string()
}

fn default_frame_interval() -> u64 {
    DEFAULT_FRAME_INTERVAL_SECONDS
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            name: default_camera_name(),
            unique_id: default_unique_id(),
            frame_interval: default_frame_interval(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub immich: ImmichConfig,
    #[serde(default)]
    pub update_interval: UpdateIntervalConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        let url = self.immich.url.trim();
        if url.is_empty() {
            return Err(AppError::Config("immich.url is required".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "immich.url must start with http:// or https://, got {}",
                url
            )));
        }
        if self.immich.api_key.trim().is_empty() {
            return Err(AppError::Config("immich.api_key is required".to_string()));
        }
        if self.update_interval.image == 0 {
            return Err(AppError::Config(
                "update_interval.image must be greater than zero".to_string(),
            ));
        }
        if self.camera.frame_interval == 0 {
            return Err(AppError::Config(
                "camera.frame_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(config_path: &Path) -> AppResult<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config = serde_yaml::from_str(&content)?;
    Ok(config)
}

pub fn save_default_config(config_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).map_err(|e| std::io::Error::other(e.to_string()))?;
    fs::write(config_path, yaml)
}
