//! Job descriptions handed to the download orchestrator.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ids::ResourceId;
use super::types::{Encoding, MediaType};
use crate::paths::safe_title;

/// What the metadata provider knows about one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub id: ResourceId,
    pub title: String,
    pub encodings: Vec<Encoding>,
}

/// Request to download one resource.
///
/// This is a pure data structure; metadata is fetched when the orchestrator
/// turns it into a [`DownloadJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub id: ResourceId,
    pub media_type: MediaType,
    /// Quality label: a resolution tier such as `720p`, `highest`, or an audio tier.
    pub quality: String,
    /// Directory that receives the final file.
    pub destination: PathBuf,
}

impl DownloadRequest {
    /// Create a request using the media type's default quality.
    pub fn new(id: ResourceId, media_type: MediaType, destination: impl Into<PathBuf>) -> Self {
        Self {
            id,
            media_type,
            quality: media_type.default_quality().to_string(),
            destination: destination.into(),
        }
    }

    /// Set the quality label.
    #[must_use]
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }
}

/// A prepared job: request plus resolved title and format catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadJob {
    pub id: ResourceId,
    pub media_type: MediaType,
    pub quality: String,
    pub destination: PathBuf,
    /// Sanitized title used as the output file stem.
    pub title: String,
    pub catalog: Vec<Encoding>,
}

impl DownloadJob {
    /// Combine a request with the provider's description of the resource.
    #[must_use]
    pub fn from_info(request: DownloadRequest, info: ResourceInfo) -> Self {
        Self {
            id: request.id,
            media_type: request.media_type,
            quality: request.quality,
            destination: request.destination,
            title: safe_title(&info.title),
            catalog: info.encodings,
        }
    }

    /// Prefix the title with a 1-based playlist position (`007 - Title`).
    #[must_use]
    pub fn with_position_prefix(mut self, position: usize) -> Self {
        self.title = format!("{position:03} - {}", self.title);
        self
    }

    /// Path of the file this job produces.
    #[must_use]
    pub fn final_path(&self) -> PathBuf {
        final_output_path(&self.destination, &self.title, self.media_type)
    }
}

/// `<destination>/<title>.<ext>` for the given media type.
#[must_use]
pub fn final_output_path(destination: &Path, title: &str, media_type: MediaType) -> PathBuf {
    destination.join(format!("{title}.{}", media_type.output_extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(title: &str) -> ResourceInfo {
        ResourceInfo {
            id: ResourceId::parse("dQw4w9WgXcQ").unwrap(),
            title: title.to_string(),
            encodings: vec![Encoding::audio_only("140", "m4a", Some(128.0))],
        }
    }

    #[test]
    fn test_request_defaults_quality() {
        let id = ResourceId::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(DownloadRequest::new(id.clone(), MediaType::Video, "/tmp").quality, "360p");
        assert_eq!(DownloadRequest::new(id, MediaType::Audio, "/tmp").quality, "high");
    }

    #[test]
    fn test_job_sanitizes_title() {
        let req = DownloadRequest::new(
            ResourceId::parse("dQw4w9WgXcQ").unwrap(),
            MediaType::Audio,
            "/music",
        );
        let job = DownloadJob::from_info(req, info("  AC/DC: Live?  "));
        assert_eq!(job.title, "ACDC Live");
        assert_eq!(job.final_path(), PathBuf::from("/music/ACDC Live.mp3"));
        assert_eq!(job.catalog.len(), 1);
    }

    #[test]
    fn test_position_prefix() {
        let req = DownloadRequest::new(
            ResourceId::parse("dQw4w9WgXcQ").unwrap(),
            MediaType::Video,
            "/v",
        );
        let job = DownloadJob::from_info(req, info("Intro")).with_position_prefix(2);
        assert_eq!(job.title, "002 - Intro");
        assert_eq!(job.final_path(), PathBuf::from("/v/002 - Intro.mp4"));
    }
}
