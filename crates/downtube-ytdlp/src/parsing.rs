//! Conversion from yt-dlp JSON to domain types.
//!
//! Size normalization happens here: `filesize` wins, `filesize_approx` is
//! rounded, and anything else leaves the content length unknown.

use downtube_core::{
    Encoding, PlaylistId, PlaylistItem, PlaylistManifest, ResourceId, ResourceInfo, SelectorToken,
};

use crate::error::{YtDlpError, YtDlpResult};
use crate::models::{RawEntry, RawFormat, RawPlaylist, RawVideo};

/// Parse a `-J --no-playlist` dump for `requested`.
pub fn parse_resource(stdout: &[u8], requested: &ResourceId) -> YtDlpResult<ResourceInfo> {
    let raw: RawVideo = serde_json::from_slice(stdout)?;
    if raw.id != requested.as_str() {
        return Err(YtDlpError::invalid_response(format!(
            "asked for {requested}, got {}",
            raw.id
        )));
    }

    let encodings: Vec<Encoding> = raw.formats.iter().filter_map(to_encoding).collect();
    Ok(ResourceInfo {
        id: requested.clone(),
        title: raw.title.unwrap_or_default(),
        encodings,
    })
}

/// Parse a `-J --flat-playlist` dump.
///
/// Entries without an id are kept as unavailable items so positions in the
/// manifest match the playlist.
pub fn parse_playlist(stdout: &[u8], id: &PlaylistId) -> YtDlpResult<PlaylistManifest> {
    let raw: RawPlaylist = serde_json::from_slice(stdout)?;
    let items = raw
        .entries
        .into_iter()
        .map(|entry| entry.map_or_else(|| PlaylistItem::unavailable(""), to_item))
        .collect();

    Ok(PlaylistManifest {
        id: id.clone(),
        title: raw.title.unwrap_or_default(),
        items,
    })
}

fn to_item(entry: RawEntry) -> PlaylistItem {
    let title = entry.title.unwrap_or_default();
    match entry.id.filter(|id| !id.is_empty()) {
        Some(id) => PlaylistItem::new(id, title),
        None => PlaylistItem::unavailable(title),
    }
}

/// Map one format entry. Entries with neither audio nor video (storyboards)
/// are dropped.
pub fn to_encoding(format: &RawFormat) -> Option<Encoding> {
    let has_audio = format.has_audio();
    let has_video = format.has_video();
    if !has_audio && !has_video {
        return None;
    }

    Some(Encoding {
        container: format.ext.clone().unwrap_or_default(),
        has_audio,
        has_video,
        resolution: if has_video {
            resolution_label(format)
        } else {
            None
        },
        audio_bitrate: if has_audio { format.abr } else { None },
        content_length: content_length(format),
        selector: SelectorToken::new(format.format_id.clone()),
    })
}

/// `format_note` when it names a resolution (`720p`, `1080p60`), otherwise
/// the height.
fn resolution_label(format: &RawFormat) -> Option<String> {
    format
        .format_note
        .as_deref()
        .map(str::trim)
        .filter(|note| note.starts_with(|c: char| c.is_ascii_digit()))
        .map(str::to_string)
        .or_else(|| format.height.map(|h| format!("{h}p")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn content_length(format: &RawFormat) -> Option<u64> {
    format.filesize.or_else(|| {
        format
            .filesize_approx
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.round() as u64)
    })
}
