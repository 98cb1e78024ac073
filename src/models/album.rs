use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::nullable;

/// Album record as served by the camera state endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Option<String>,
    pub title: Option<String>,
    pub shared: Option<bool>,
    pub media_items_count: Option<i64>,
}

/// Album as returned by `GET /api/album` and `GET /api/album/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumResponse {
    #[serde(deserialize_with = "nullable")]
    id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    album_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    shared: Option<bool>,
    #[serde(deserialize_with = "nullable")]
    asset_count: Option<i64>,
}

impl From<AlbumResponse> for Album {
    fn from(response: AlbumResponse) -> Self {
        Self {
            id: response.id,
            title: response.album_name,
            shared: response.shared,
            media_items_count: response.asset_count,
        }
    }
}

impl Album {
    /// Maps an upstream album object. Any missing or mistyped key yields the
    /// empty album; `null` values are kept as absent.
    pub fn from_json(value: &Value) -> Self {
        match AlbumResponse::deserialize(value) {
            Ok(response) => response.into(),
            Err(e) => {
                tracing::debug!("Unable to map album: {}", e);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }
}
