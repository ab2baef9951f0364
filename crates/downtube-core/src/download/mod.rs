//! Download domain types, errors, and identifiers.
//!
//! This module contains pure data types for the download system. No I/O,
//! networking, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Catalog entries and selection (`Encoding`, `SelectionResult`, `MediaType`)
//! - `ids` - Validated identifiers (`ResourceId`, `PlaylistId`)
//! - `job` - Requests and prepared jobs (`DownloadRequest`, `DownloadJob`)
//! - `playlist` - Playlist manifests
//! - `progress` - Progress snapshots
//! - `errors` - Error types for download operations

pub mod errors;
pub mod ids;
pub mod job;
pub mod playlist;
pub mod progress;
pub mod types;

// Re-export commonly used types
pub use errors::{DownloadError, DownloadResult};
pub use ids::{PlaylistId, ResourceId, is_playlist_input};
pub use job::{DownloadJob, DownloadRequest, ResourceInfo, final_output_path};
pub use playlist::{PlaylistItem, PlaylistManifest};
pub use progress::ProgressSnapshot;
pub use types::{
    AudioQuality, Encoding, MediaType, PREFERRED_AUDIO_CONTAINERS, SelectionResult,
    SelectorToken, StreamKind,
};
