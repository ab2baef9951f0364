//! Validated resource and playlist identifiers parsed from user input.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

use super::errors::{DownloadError, DownloadResult};

const VIDEO_ID_LEN: usize = 11;

/// Minimum length of a bare playlist id, so it is never confused with a video id.
const MIN_BARE_PLAYLIST_LEN: usize = 12;

const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

static PLAYLIST_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").expect("valid list= pattern"));

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN && s.chars().all(is_id_char)
}

/// Identifier of a single media resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Parse a watch/shorts/embed/live/short-link URL or a bare id.
    pub fn parse(input: &str) -> DownloadResult<Self> {
        let input = input.trim();
        if is_video_id(input) {
            return Ok(Self(input.to_string()));
        }

        let url = parse_loose_url(input).ok_or_else(|| invalid_url(input))?;
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

        let candidate = if host == "youtu.be" {
            url.path_segments().and_then(|mut s| s.next()).map(str::to_string)
        } else if VIDEO_HOSTS.contains(&host.as_str()) {
            let mut segments = url.path_segments().into_iter().flatten();
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
                _ => None,
            }
        } else {
            None
        };

        match candidate {
            Some(id) if is_video_id(&id) => Ok(Self(id)),
            _ => Err(invalid_url(input)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL handed to providers.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Extract the `list=` parameter from a URL, or accept a bare playlist id.
    pub fn parse(input: &str) -> DownloadResult<Self> {
        let input = input.trim();
        if let Some(caps) = PLAYLIST_PARAM.captures(input) {
            return Ok(Self(caps[1].to_string()));
        }
        if input.len() >= MIN_BARE_PLAYLIST_LEN && input.chars().all(is_id_char) {
            return Ok(Self(input.to_string()));
        }
        Err(DownloadError::invalid_input(format!(
            "Invalid playlist URL: {input}"
        )))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("https://www.youtube.com/playlist?list={}", self.0)
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when the input names a playlist rather than a single resource.
#[must_use]
pub fn is_playlist_input(input: &str) -> bool {
    PLAYLIST_PARAM.is_match(input)
}

fn parse_loose_url(input: &str) -> Option<Url> {
    Url::parse(input)
        .ok()
        .or_else(|| Url::parse(&format!("https://{input}")).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

fn invalid_url(input: &str) -> DownloadError {
    DownloadError::invalid_input(format!("Invalid YouTube URL: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_url() {
        let id = ResourceId::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(
            id.canonical_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_parse_short_forms() {
        for input in [
            "https://youtu.be/dQw4w9WgXcQ",
            "youtube.com/shorts/dQw4w9WgXcQ",
            "https://m.youtube.com/embed/dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ] {
            assert_eq!(
                ResourceId::parse(input).unwrap().as_str(),
                "dQw4w9WgXcQ",
                "{input}"
            );
        }
    }

    #[test]
    fn test_rejects_foreign_hosts_and_bad_ids() {
        assert!(ResourceId::parse("https://vimeo.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(ResourceId::parse("https://youtube.com/watch?v=short").is_err());
        assert!(ResourceId::parse("ftp://youtube.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(ResourceId::parse("").is_err());
    }

    #[test]
    fn test_playlist_parse() {
        let id = PlaylistId::parse(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG",
        )
        .unwrap();
        assert_eq!(id.as_str(), "PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG");

        assert!(PlaylistId::parse("PLx0sYbCqOb8TBPRdm").is_ok());
        assert!(PlaylistId::parse("dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn test_is_playlist_input() {
        assert!(is_playlist_input("https://youtube.com/playlist?list=PL123"));
        assert!(!is_playlist_input("https://youtu.be/dQw4w9WgXcQ"));
    }
}
