//! Settings domain types and validation.
//!
//! This module contains the core settings types used across the application.
//! These are pure domain types with no infrastructure dependencies; the CLI
//! bootstrap fills them from flags and environment variables.

use serde::{Deserialize, Serialize};

/// Default number of playlist entries fetched from the provider.
pub const DEFAULT_PLAYLIST_LIMIT: u32 = 100;

/// Upper bound accepted for the playlist fetch limit.
pub const MAX_PLAYLIST_LIMIT: u32 = 5_000;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default output directory.
    pub output_dir: Option<String>,

    /// Explicit path to the `ffmpeg` binary.
    pub ffmpeg_path: Option<String>,

    /// Explicit path to the `yt-dlp` binary.
    pub ytdlp_path: Option<String>,

    /// `arnndn` model file for noise reduction. No filter when unset.
    pub denoise_model: Option<String>,

    /// Maximum number of playlist entries to fetch.
    pub playlist_limit: Option<u32>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            output_dir: None,
            ffmpeg_path: None,
            ytdlp_path: None,
            denoise_model: None,
            playlist_limit: Some(DEFAULT_PLAYLIST_LIMIT),
        }
    }

    /// Get the effective playlist limit (with default fallback).
    #[must_use]
    pub const fn effective_playlist_limit(&self) -> u32 {
        match self.playlist_limit {
            Some(limit) => limit,
            None => DEFAULT_PLAYLIST_LIMIT,
        }
    }

    /// Output directory, defaulting to the current directory.
    #[must_use]
    pub fn effective_output_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(".")
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref dir) = other.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(ref path) = other.ffmpeg_path {
            self.ffmpeg_path.clone_from(path);
        }
        if let Some(ref path) = other.ytdlp_path {
            self.ytdlp_path.clone_from(path);
        }
        if let Some(ref model) = other.denoise_model {
            self.denoise_model.clone_from(model);
        }
        if let Some(ref limit) = other.playlist_limit {
            self.playlist_limit = *limit;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub output_dir: Option<Option<String>>,
    pub ffmpeg_path: Option<Option<String>>,
    pub ytdlp_path: Option<Option<String>>,
    pub denoise_model: Option<Option<String>>,
    pub playlist_limit: Option<Option<u32>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Playlist limit must be between 1 and {MAX_PLAYLIST_LIMIT}, got {0}")]
    InvalidPlaylistLimit(u32),

    #[error("{0} cannot be empty")]
    EmptyPath(&'static str),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(limit) = settings.playlist_limit {
        if !(1..=MAX_PLAYLIST_LIMIT).contains(&limit) {
            return Err(SettingsError::InvalidPlaylistLimit(limit));
        }
    }

    let paths = [
        ("Output directory", &settings.output_dir),
        ("ffmpeg path", &settings.ffmpeg_path),
        ("yt-dlp path", &settings.ytdlp_path),
        ("Denoise model path", &settings.denoise_model),
    ];
    for (name, value) in paths {
        if value.as_ref().is_some_and(|p| p.trim().is_empty()) {
            return Err(SettingsError::EmptyPath(name));
        }
    }

    Ok(())
}
