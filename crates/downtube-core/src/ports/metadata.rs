//! Metadata provider port.
//!
//! Describes a resource (title plus format catalog) or a playlist. The
//! provider is a black box: the core never sees how the description is
//! obtained.

use async_trait::async_trait;

use crate::download::{DownloadResult, PlaylistId, PlaylistManifest, ResourceId, ResourceInfo};

/// Port for fetching resource and playlist descriptions.
///
/// Failures are reported as [`DownloadError::Metadata`](crate::DownloadError::Metadata)
/// and surfaced to the caller unchanged.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Title and encoding catalog of a single resource.
    async fn fetch_resource(&self, id: &ResourceId) -> DownloadResult<ResourceInfo>;

    /// Ordered manifest of a playlist, truncated to at most `limit` items.
    async fn fetch_playlist(&self, id: &PlaylistId, limit: usize)
    -> DownloadResult<PlaylistManifest>;
}
