//! Playlist manifest types.

use serde::{Deserialize, Serialize};

use super::ids::PlaylistId;

/// One entry of a playlist. Some providers return entries without an id
/// (deleted or private items); those are skipped at download time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: Option<String>,
    pub title: String,
}

impl PlaylistItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
        }
    }

    /// An entry the provider listed without an identifier.
    pub fn unavailable(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }
}

/// Ordered, read-only description of a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistManifest {
    pub id: PlaylistId,
    pub title: String,
    pub items: Vec<PlaylistItem>,
}

impl PlaylistManifest {
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
