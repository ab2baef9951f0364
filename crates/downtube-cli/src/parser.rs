//! Command-line parser.
//!
//! downtube takes a single URL (positionally or via `--url`) and decides
//! between a single download, a playlist run, or a format listing from the
//! URL and flags.

use std::path::PathBuf;

use clap::Parser;

/// Download YouTube videos and playlists as MP4 or MP3.
#[derive(Parser, Debug)]
#[command(name = "downtube")]
#[command(version, about = "Download YouTube videos and playlists as MP4 or MP3")]
#[command(after_help = "Examples:
  $ downtube https://youtube.com/watch?v=dQw4w9WgXcQ
  $ downtube --url https://youtu.be/dQw4w9WgXcQ --type audio --quality high -o ./downloads
  $ downtube https://youtu.be/dQw4w9WgXcQ --list-formats
  $ downtube 'https://www.youtube.com/playlist?list=PL...' --range 3-7")]
pub struct Cli {
    /// Video or playlist URL
    #[arg(value_name = "URL")]
    pub positional_url: Option<String>,

    /// Video or playlist URL (alternative to the positional argument)
    #[arg(short = 'u', long = "url", conflicts_with = "positional_url")]
    pub url: Option<String>,

    /// What to download: video or audio
    #[arg(short = 't', long = "type", default_value = "video")]
    pub media_type: String,

    /// Quality: 144p, 360p, 480p, 720p, 1080p, highest (video) or low, medium, high (audio)
    #[arg(short = 'q', long = "quality")]
    pub quality: Option<String>,

    /// Output directory [env: DOWNTUBE_OUTPUT, default: .]
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Path to the ffmpeg executable
    #[arg(long = "ffmpeg", value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the yt-dlp executable
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub ytdlp: Option<PathBuf>,

    /// Noise-reduction model (arnndn) applied to the audio track
    #[arg(long = "denoise-model", value_name = "PATH")]
    pub denoise_model: Option<PathBuf>,

    /// Print the available formats and the selection instead of downloading
    #[arg(long = "list-formats")]
    pub list_formats: bool,

    /// Playlist items to download, 1-based and inclusive (e.g. 3-7 or 3-)
    #[arg(long = "range", value_name = "N-M", value_parser = parse_range, conflicts_with = "items")]
    pub range: Option<ItemRange>,

    /// Playlist items to download, 1-based (e.g. 1,4,9)
    #[arg(long = "items", value_name = "LIST", value_parser = parse_items)]
    pub items: Option<ItemList>,

    /// Maximum number of playlist entries to fetch [env: DOWNTUBE_PLAYLIST_LIMIT]
    #[arg(long = "limit")]
    pub limit: Option<u32>,
}

impl Cli {
    /// The URL given either way.
    pub fn target(&self) -> Option<&str> {
        self.positional_url
            .as_deref()
            .or(self.url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Which playlist items to download.
    pub fn selection(&self) -> PlaylistSelection {
        match (&self.range, &self.items) {
            (Some(range), _) => PlaylistSelection::Range(*range),
            (None, Some(items)) => PlaylistSelection::Items(items.0.clone()),
            (None, None) => PlaylistSelection::All,
        }
    }
}

/// A 1-based inclusive item range. `end: None` runs to the last item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl ItemRange {
    /// 0-based bounds for the collection orchestrator.
    pub fn to_zero_based(self) -> (usize, Option<usize>) {
        (self.start - 1, self.end.map(|e| e - 1))
    }
}

/// Comma-separated 1-based item numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList(pub Vec<usize>);

/// Playlist mode chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSelection {
    All,
    Range(ItemRange),
    /// 1-based item numbers.
    Items(Vec<usize>),
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("item numbers start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not an item number", raw.trim())),
    }
}

fn parse_range(raw: &str) -> Result<ItemRange, String> {
    let (start, end) = match raw.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (raw, None),
    };
    let start = parse_position(start)?;
    let end = match end.map(str::trim) {
        None => Some(start),
        Some("") => None,
        Some(end) => Some(parse_position(end)?),
    };
    if end.is_some_and(|end| end < start) {
        return Err(format!("range end comes before start in '{raw}'"));
    }
    Ok(ItemRange { start, end })
}

fn parse_items(raw: &str) -> Result<ItemList, String> {
    let items = raw
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_position)
        .collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        return Err("no items given".to_string());
    }
    Ok(ItemList(items))
}
