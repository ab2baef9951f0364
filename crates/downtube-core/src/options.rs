//! Validation of user-supplied download options.

use std::path::{Path, PathBuf};

use crate::download::{AudioQuality, DownloadError, DownloadResult, MediaType};

/// Quality tiers accepted for video downloads.
pub const VIDEO_QUALITIES: &[&str] = &["144p", "360p", "480p", "720p", "1080p", "highest"];

/// Quality tiers accepted for audio downloads.
pub const AUDIO_QUALITIES: &[&str] = &["low", "medium", "high"];

/// Options after validation and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub media_type: MediaType,
    pub quality: String,
    pub output: PathBuf,
}

/// Validate and default raw options.
///
/// Every problem found is collected; they are reported together as a single
/// `InvalidInput` whose message lists them one per line.
pub fn validate_options(
    media_type: &str,
    quality: Option<&str>,
    output: &Path,
) -> DownloadResult<DownloadOptions> {
    let mut errors = Vec::new();

    let parsed = match media_type.parse::<MediaType>() {
        Ok(t) => Some(t),
        Err(e) => {
            errors.push(e.user_message());
            None
        }
    };

    let quality = quality.map(str::trim).filter(|q| !q.is_empty());
    let quality = match parsed {
        Some(MediaType::Video) => {
            let q = quality.unwrap_or(MediaType::Video.default_quality()).to_ascii_lowercase();
            if !VIDEO_QUALITIES.contains(&q.as_str()) {
                errors.push(format!(
                    "Invalid quality for video: {q}. Supported: {}",
                    VIDEO_QUALITIES.join(", ")
                ));
            }
            q
        }
        Some(MediaType::Audio) => {
            let q = quality.unwrap_or(MediaType::Audio.default_quality());
            match AudioQuality::from_label(q) {
                Some(tier) => tier.to_string(),
                None => {
                    errors.push(format!(
                        "Invalid quality for audio: {q}. Supported: {}",
                        AUDIO_QUALITIES.join(", ")
                    ));
                    q.to_string()
                }
            }
        }
        None => quality.unwrap_or_default().to_string(),
    };

    if !output.is_dir() {
        errors.push(format!(
            "Output directory does not exist: {}",
            output.display()
        ));
    }

    match parsed {
        Some(media_type) if errors.is_empty() => Ok(DownloadOptions {
            media_type,
            quality,
            output: output.to_path_buf(),
        }),
        _ => Err(DownloadError::invalid_input(errors.join("\n"))),
    }
}
