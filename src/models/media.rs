use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::{MEDIA_TYPE_IMAGE, MEDIA_TYPE_VIDEO};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDetails {
    pub focal_length: Option<f64>,
    pub aperture: Option<f64>,
    pub iso: Option<i64>,
    pub exposure_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub fps: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub creation_time: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub orientation: Option<i32>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoDetails>,
}

impl MediaMetadata {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: Option<String>,
    /// Asset kind as reported by the server (`IMAGE`, `VIDEO`).
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub filename: Option<String>,
    pub metadata: Option<MediaMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetResponse {
    id: String,
    #[serde(rename = "type")]
    asset_type: String,
    original_path: String,
    file_created_at: String,
    exif_info: ExifInfo,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExifInfo {
    #[serde(deserialize_with = "nullable")]
    description: Option<String>,
    #[serde(deserialize_with = "nullable")]
    exif_image_width: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    exif_image_height: Option<i64>,
    #[serde(deserialize_with = "deserialize_orientation")]
    orientation: Option<i32>,
    #[serde(deserialize_with = "nullable")]
    make: Option<String>,
    #[serde(deserialize_with = "nullable")]
    model: Option<String>,
    #[serde(default)]
    focal_length: Option<f64>,
    #[serde(default)]
    f_number: Option<f64>,
    #[serde(default)]
    iso: Option<i64>,
    #[serde(default)]
    exposure_time: Option<String>,
    #[serde(default)]
    fps: Option<f64>,
}

// The key must be present; `null` maps to `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

// Immich sends the orientation as a numeric string, older servers as a number.
fn deserialize_orientation<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

impl From<AssetResponse> for Media {
    fn from(asset: AssetResponse) -> Self {
        let exif = asset.exif_info;

        let photo = (asset.asset_type == MEDIA_TYPE_IMAGE).then(|| PhotoDetails {
            focal_length: exif.focal_length,
            aperture: exif.f_number,
            iso: exif.iso,
            exposure_time: exif.exposure_time.clone(),
        });
        let video = (asset.asset_type == MEDIA_TYPE_VIDEO).then(|| VideoDetails {
            fps: exif.fps,
            status: asset.status.clone(),
        });

        Self {
            id: Some(asset.id),
            mime_type: Some(asset.asset_type),
            description: exif.description,
            filename: Some(asset.original_path),
            metadata: Some(MediaMetadata {
                creation_time: Some(asset.file_created_at),
                width: exif.exif_image_width,
                height: exif.exif_image_height,
                orientation: exif.orientation,
                camera_make: exif.make,
                camera_model: exif.model,
                photo,
                video,
            }),
        }
    }
}

impl Media {
    /// Maps an upstream asset object. Any missing or mistyped required field
    /// yields the empty media item.
    pub fn from_json(value: &Value) -> Self {
        match AssetResponse::deserialize(value) {
            Ok(asset) => asset.into(),
            Err(e) => {
                tracing::debug!("Unable to map media: {}", e);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.as_deref() == Some(MEDIA_TYPE_IMAGE)
    }

    pub fn orientation(&self) -> Option<i32> {
        self.metadata.as_ref().and_then(|m| m.orientation)
    }
}
