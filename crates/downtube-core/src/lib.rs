//! Core domain types and port definitions for downtube.
//!
//! This crate has no knowledge of processes, terminals, or the network. It
//! defines what a download *is* (encodings, selections, jobs, playlists),
//! the errors a download can end with, and the ports through which the
//! download engine reaches its external collaborators.
//!
//! # Structure
//!
//! - [`download`] - Domain types, identifiers, and `DownloadError`
//! - [`ports`] - `MetadataProvider`, `TransferProvider`, `EncoderPort`, `ProgressSink`
//! - [`settings`] - Application settings with defaults, merge, and validation
//! - [`options`] - Validation of user-supplied download options
//! - [`paths`] - File and folder naming helpers

#![deny(unused_crate_dependencies)]

pub mod download;
pub mod options;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use download::{
    AudioQuality, DownloadError, DownloadJob, DownloadRequest, DownloadResult, Encoding,
    MediaType, PREFERRED_AUDIO_CONTAINERS, PlaylistId, PlaylistItem, PlaylistManifest,
    ProgressSnapshot, ResourceId, ResourceInfo, SelectionResult, SelectorToken, StreamKind,
    final_output_path, is_playlist_input,
};
pub use options::{AUDIO_QUALITIES, DownloadOptions, VIDEO_QUALITIES, validate_options};
pub use paths::{playlist_folder, safe_title, temp_artifact_name};
pub use ports::{
    ChunkStream, EncodeRequest, EncoderPort, MetadataProvider, NoopProgressSink, ProgressSink,
    Transfer, TransferProvider,
};
pub use settings::{
    DEFAULT_PLAYLIST_LIMIT, MAX_PLAYLIST_LIMIT, Settings, SettingsError, SettingsUpdate,
    validate_settings,
};
