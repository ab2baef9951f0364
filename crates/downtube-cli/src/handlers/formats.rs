//! Format listing (`--list-formats`).
//!
//! Prints a resource's catalog and the encodings a download with the
//! current options would pick, without transferring anything.

use anyhow::Result;

use downtube_core::{DownloadOptions, Encoding, MediaType, ResourceId};
use downtube_download::select_formats;

use crate::bootstrap::CliContext;
use crate::presentation::{format_optional, human_bytes, print_separator, truncate_string};

/// Execute the format listing.
pub async fn execute(ctx: &CliContext, url: &str, options: &DownloadOptions) -> Result<()> {
    let id = ResourceId::parse(url)?;
    let info = ctx.metadata().fetch_resource(&id).await?;

    println!("{} [{}]", info.title, info.id);
    println!("Found {} format(s):\n", info.encodings.len());
    println!("{}", header());
    print_separator(64);
    for encoding in &info.encodings {
        println!("{}", format_row(encoding));
    }
    print_separator(64);

    for line in selection_lines(&info.encodings, options) {
        println!("{line}");
    }
    Ok(())
}

fn header() -> String {
    format!(
        "{:<10} {:<6} {:<11} {:<10} {:>8} {:>12}",
        "Format", "Ext", "Kind", "Resolution", "Bitrate", "Size"
    )
}

fn format_row(encoding: &Encoding) -> String {
    let bitrate = encoding.audio_bitrate.map(|kbps| format!("{kbps:.0}k"));
    let size = encoding.content_length.map(human_bytes);
    format!(
        "{:<10} {:<6} {:<11} {:<10} {:>8} {:>12}",
        truncate_string(encoding.selector.as_str(), 10),
        truncate_string(&encoding.container, 6),
        encoding.kind_label(),
        format_optional(encoding.resolution.as_ref(), "--"),
        format_optional(bitrate.as_ref(), "--"),
        format_optional(size.as_ref(), "--"),
    )
}

/// What a download with `options` would fetch.
fn selection_lines(encodings: &[Encoding], options: &DownloadOptions) -> Vec<String> {
    let selection = select_formats(encodings, options.media_type, &options.quality);
    let describe = |e: &Encoding| {
        let detail = e
            .resolution
            .clone()
            .or_else(|| e.audio_bitrate.map(|kbps| format!("{kbps:.0}k")))
            .unwrap_or_default();
        format!("{} ({} {})", e.selector, e.container, detail).replace(" )", ")")
    };

    let mut lines = vec![format!(
        "Selection for {} @ {}:",
        options.media_type, options.quality
    )];

    if options.media_type == MediaType::Video {
        lines.push(format!(
            "  video: {}",
            selection.video.as_ref().map_or_else(|| "none".to_string(), describe)
        ));
    }

    let audio = match &selection.audio {
        Some(audio) if audio.is_muxed() => format!("{} from muxed stream", describe(audio)),
        Some(audio) => describe(audio),
        None => "none".to_string(),
    };
    lines.push(format!("  audio: {audio}"));

    if selection.expected_bytes > 0 {
        lines.push(format!("  expected size: {}", human_bytes(selection.expected_bytes)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options(media_type: MediaType, quality: &str) -> DownloadOptions {
        DownloadOptions {
            media_type,
            quality: quality.to_string(),
            output: PathBuf::from("."),
        }
    }

    fn catalog() -> Vec<Encoding> {
        vec![
            Encoding::audio_only("140", "m4a", Some(128.0)).with_content_length(2048),
            Encoding::audio_only("251", "webm", Some(160.0)),
            Encoding::video_only("134", "mp4", "360p"),
            Encoding::video_only("136", "mp4", "720p").with_content_length(1024 * 1024),
        ]
    }

    #[test]
    fn test_format_row() {
        let row = format_row(&catalog()[0]);
        assert!(row.starts_with("140 "));
        assert!(row.contains("audio only"));
        assert!(row.contains("128k"));
        assert!(row.contains("2.0 KiB"));

        let row = format_row(&catalog()[2]);
        assert!(row.contains("360p"));
        assert!(row.contains("--"));
        assert_eq!(row.len(), header().len());
    }

    #[test]
    fn test_selection_lines_for_video() {
        let lines = selection_lines(&catalog(), &options(MediaType::Video, "480p"));
        assert_eq!(lines[0], "Selection for video @ 480p:");
        assert_eq!(lines[1], "  video: 136 (mp4 720p)");
        assert_eq!(lines[2], "  audio: 140 (m4a 128k)");
        assert_eq!(lines[3], "  expected size: 1.0 MiB");
    }

    #[test]
    fn test_selection_lines_muxed_fallback() {
        let catalog = vec![
            Encoding::muxed("18", "mp4", "360p", Some(96.0)),
            Encoding::muxed("22", "mp4", "720p", Some(192.0)),
        ];
        let lines = selection_lines(&catalog, &options(MediaType::Video, "720p"));
        assert_eq!(lines[1], "  video: 22 (mp4 720p)");
        assert_eq!(lines[2], "  audio: 22 (mp4 720p) from muxed stream");

        let lines = selection_lines(&catalog, &options(MediaType::Audio, "high"));
        assert_eq!(lines[1], "  audio: 22 (mp4 720p) from muxed stream");
    }

    #[test]
    fn test_selection_lines_for_audio_without_audio() {
        let catalog = vec![Encoding::video_only("136", "mp4", "720p")];
        let lines = selection_lines(&catalog, &options(MediaType::Audio, "high"));
        assert_eq!(lines, vec!["Selection for audio @ high:", "  audio: none"]);
    }
}
