//! Shapes of the yt-dlp JSON dump.
//!
//! Only the fields the adapter reads are declared; serde ignores the rest.
//! These types never leave the crate.

use serde::Deserialize;

/// `yt-dlp -J --no-playlist` output for one video.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVideo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// One entry of `formats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    /// yt-dlp computes this from bitrate and duration; it can be fractional.
    #[serde(default)]
    pub filesize_approx: Option<f64>,
}

impl RawFormat {
    pub fn has_audio(&self) -> bool {
        codec_present(self.acodec.as_deref())
    }

    pub fn has_video(&self) -> bool {
        codec_present(self.vcodec.as_deref())
    }
}

fn codec_present(codec: Option<&str>) -> bool {
    codec.is_some_and(|c| !c.is_empty() && c != "none")
}

/// `yt-dlp -J --flat-playlist` output.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlaylist {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Vec<Option<RawEntry>>,
}

/// A flat playlist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
