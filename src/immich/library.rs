use async_trait::async_trait;

use crate::models::{Album, Media, User};

/// What the orchestrator and the HTTP surface need from a photo server.
/// Implementations never fail: errors are logged and surface as empty
/// records, `false` or `None`.
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    async fn ping(&self) -> bool;

    async fn current_user(&self) -> Option<User>;

    async fn random_album(&self, shared: bool) -> Album;

    async fn random_media(&self, album_id: Option<&str>) -> Media;

    async fn media_content(&self, media_id: &str) -> Option<Vec<u8>>;
}
