//! Core domain types for downloads.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::DownloadError;

/// Audio containers preferred by the resolver, in no particular order.
pub const PREFERRED_AUDIO_CONTAINERS: &[&str] = &["m4a", "mp4"];

/// Requested kind of output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Video,
    Audio,
}

impl MediaType {
    /// Extension of the final output file.
    #[must_use]
    pub const fn output_extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }

    /// Quality used when the user gives none.
    #[must_use]
    pub const fn default_quality(self) -> &'static str {
        match self {
            Self::Video => "360p",
            Self::Audio => "high",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            other => Err(DownloadError::invalid_input(format!(
                "Invalid type: {other}. Supported types: video, audio"
            ))),
        }
    }
}

/// Stream filter passed to the transfer provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    AudioOnly,
    VideoOnly,
}

impl StreamKind {
    /// Container used for the temporary artifact when the encoding has none.
    #[must_use]
    pub const fn default_container(self) -> &'static str {
        match self {
            Self::AudioOnly => "m4a",
            Self::VideoOnly => "mp4",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudioOnly => f.write_str("audio"),
            Self::VideoOnly => f.write_str("video"),
        }
    }
}

/// Opaque token handed back to the transfer provider to fetch one encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorToken(String);

impl SelectorToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a resource's format catalog.
///
/// Immutable once the provider returns it. Size fields reported in several
/// shapes by the remote side are normalized into `content_length` by the
/// provider adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    /// Container / format tag (e.g. `m4a`, `webm`, `mp4`).
    pub container: String,
    pub has_audio: bool,
    pub has_video: bool,
    /// Human resolution label such as `720p` or `1080p60`.
    pub resolution: Option<String>,
    /// Audio bitrate in kbps.
    pub audio_bitrate: Option<f64>,
    /// Size in bytes, when the catalog knows it.
    pub content_length: Option<u64>,
    pub selector: SelectorToken,
}

impl Encoding {
    /// An audio-only entry.
    pub fn audio_only(
        selector: impl Into<String>,
        container: impl Into<String>,
        audio_bitrate: Option<f64>,
    ) -> Self {
        Self {
            container: container.into(),
            has_audio: true,
            has_video: false,
            resolution: None,
            audio_bitrate,
            content_length: None,
            selector: SelectorToken::new(selector),
        }
    }

    /// A video-only entry.
    pub fn video_only(
        selector: impl Into<String>,
        container: impl Into<String>,
        resolution: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            has_audio: false,
            has_video: true,
            resolution: Some(resolution.into()),
            audio_bitrate: None,
            content_length: None,
            selector: SelectorToken::new(selector),
        }
    }

    /// An entry carrying both audio and video.
    pub fn muxed(
        selector: impl Into<String>,
        container: impl Into<String>,
        resolution: impl Into<String>,
        audio_bitrate: Option<f64>,
    ) -> Self {
        Self {
            container: container.into(),
            has_audio: true,
            has_video: true,
            resolution: Some(resolution.into()),
            audio_bitrate,
            content_length: None,
            selector: SelectorToken::new(selector),
        }
    }

    #[must_use]
    pub const fn with_content_length(mut self, bytes: u64) -> Self {
        self.content_length = Some(bytes);
        self
    }

    #[must_use]
    pub const fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }

    #[must_use]
    pub const fn is_video_only(&self) -> bool {
        self.has_video && !self.has_audio
    }

    #[must_use]
    pub const fn is_muxed(&self) -> bool {
        self.has_audio && self.has_video
    }

    /// Short classification used in format listings.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match (self.has_audio, self.has_video) {
            (true, true) => "muxed",
            (true, false) => "audio only",
            (false, true) => "video only",
            (false, false) => "unknown",
        }
    }

    /// Bitrate used for ranking; missing ranks as 0.
    #[must_use]
    pub fn bitrate_rank(&self) -> f64 {
        self.audio_bitrate.unwrap_or(0.0)
    }

    /// Size used for ranking and totals; missing counts as 0.
    #[must_use]
    pub fn size_or_zero(&self) -> u64 {
        self.content_length.unwrap_or(0)
    }

    /// Container for the temporary artifact holding this encoding.
    #[must_use]
    pub fn artifact_container(&self, kind: StreamKind) -> &str {
        if self.container.is_empty() {
            kind.default_container()
        } else {
            &self.container
        }
    }
}

/// Outcome of format resolution for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SelectionResult {
    pub audio: Option<Encoding>,
    pub video: Option<Encoding>,
    /// Sum of the known sizes of the chosen encodings.
    pub expected_bytes: u64,
}

impl SelectionResult {
    #[must_use]
    pub fn new(audio: Option<Encoding>, video: Option<Encoding>) -> Self {
        let expected_bytes = audio.as_ref().map_or(0, Encoding::size_or_zero)
            + video.as_ref().map_or(0, Encoding::size_or_zero);
        Self {
            audio,
            video,
            expected_bytes,
        }
    }
}

/// Audio output quality, mapped onto encoder VBR levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl AudioQuality {
    /// libmp3lame `-q:a` value (0 is best).
    #[must_use]
    pub const fn vbr_level(self) -> u8 {
        match self {
            Self::Low => 7,
            Self::Medium => 4,
            Self::High => 0,
        }
    }

    /// Interpret a free-form quality label. Resolution labels fall back to `High`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        match label.as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" | "" => Some(Self::High),
            s if s.ends_with('p') && s[..s.len() - 1].chars().all(|c| c.is_ascii_digit()) => {
                Some(Self::High)
            }
            _ => None,
        }
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parse() {
        assert_eq!("video".parse::<MediaType>().unwrap(), MediaType::Video);
        assert_eq!(" Audio ".parse::<MediaType>().unwrap(), MediaType::Audio);
        assert!(matches!(
            "podcast".parse::<MediaType>(),
            Err(DownloadError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(MediaType::Video.output_extension(), "mp4");
        assert_eq!(MediaType::Audio.output_extension(), "mp3");
    }

    #[test]
    fn test_encoding_classification() {
        let a = Encoding::audio_only("140", "m4a", Some(128.0));
        let v = Encoding::video_only("137", "mp4", "1080p");
        let m = Encoding::muxed("18", "mp4", "360p", Some(96.0));

        assert!(a.is_audio_only() && !a.is_muxed());
        assert!(v.is_video_only() && !v.is_audio_only());
        assert!(m.is_muxed() && !m.is_video_only());
        assert_eq!(m.kind_label(), "muxed");
    }

    #[test]
    fn test_selection_expected_bytes_ignores_unknown() {
        let a = Encoding::audio_only("140", "m4a", Some(128.0)).with_content_length(1_000);
        let v = Encoding::video_only("137", "mp4", "1080p");
        let sel = SelectionResult::new(Some(a), Some(v));
        assert_eq!(sel.expected_bytes, 1_000);
    }

    #[test]
    fn test_artifact_container_default() {
        let mut a = Encoding::audio_only("140", "", None);
        assert_eq!(a.artifact_container(StreamKind::AudioOnly), "m4a");
        a.container = "webm".to_string();
        assert_eq!(a.artifact_container(StreamKind::AudioOnly), "webm");
    }

    #[test]
    fn test_audio_quality_labels() {
        assert_eq!(AudioQuality::from_label("low"), Some(AudioQuality::Low));
        assert_eq!(AudioQuality::from_label("720p"), Some(AudioQuality::High));
        assert_eq!(AudioQuality::from_label("ultra"), None);
        assert_eq!(AudioQuality::Medium.vbr_level(), 4);
    }

    #[test]
    fn test_selector_serializes_transparently() {
        let token = SelectorToken::new("251");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"251\"");
    }
}
