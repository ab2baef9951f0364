//! Filesystem naming helpers.
//!
//! Pure string/path functions: nothing here touches the disk.

use std::path::{Path, PathBuf};

use crate::download::PlaylistId;

/// Characters that are not allowed in output file and folder names.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip characters that are invalid in file names and trim whitespace.
///
/// An empty result becomes `untitled-<unix millis>`.
#[must_use]
pub fn safe_title(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        format!("untitled-{}", chrono::Utc::now().timestamp_millis())
    } else {
        cleaned.to_string()
    }
}

/// Folder a playlist is downloaded into: `<destination>/<sanitized title>`,
/// or `<destination>/playlist-<id>` when the title sanitizes to nothing.
#[must_use]
pub fn playlist_folder(destination: &Path, title: &str, id: &PlaylistId) -> PathBuf {
    let cleaned: String = title.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        destination.join(format!("playlist-{id}"))
    } else {
        destination.join(cleaned)
    }
}

/// Name for a temporary artifact: `.__tmp_<millis>-<pid>-<random>.<container>`.
///
/// The random part is supplied by the caller so this stays deterministic.
#[must_use]
pub fn temp_artifact_name(millis: i64, pid: u32, random: &str, container: &str) -> String {
    format!(".__tmp_{millis}-{pid}-{random}.{container}")
}
