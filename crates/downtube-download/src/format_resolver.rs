//! Format catalog resolution.
//!
//! Centralizes the rules for picking the audio and video encodings of a
//! resource, so the orchestrator and the CLI's format listing agree on what
//! "best" means.
//!
//! # Selection Rules
//!
//! Audio (always computed, video output needs an audio track too):
//!
//! 1. Audio-only entries in a preferred container (`m4a`, `mp4`): highest bitrate
//! 2. Any audio-only entry: highest bitrate, then largest size
//! 3. Muxed entries: highest bitrate, then largest size
//! 4. Nothing
//!
//! Video (only for video jobs): candidates are video-only entries, else muxed
//! ones. An exact resolution match wins, then the closest resolution above the
//! request, then the highest available. `highest` or an unparseable request
//! takes the highest available.
//!
//! Missing bitrate or size ranks as 0. Entries that still tie keep catalog
//! order. Resolution never fails: absence is `None`, and the orchestrator
//! decides whether that is an error.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use downtube_core::download::{Encoding, MediaType, PREFERRED_AUDIO_CONTAINERS, SelectionResult};

static RESOLUTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*p").expect("valid resolution pattern"));

/// Select the audio and (for video jobs) video encodings for a request.
#[must_use]
pub fn select_formats(
    encodings: &[Encoding],
    media_type: MediaType,
    quality: &str,
) -> SelectionResult {
    let audio = select_audio(encodings);
    let video = match media_type {
        MediaType::Video => select_video(encodings, quality),
        MediaType::Audio => None,
    };
    SelectionResult::new(audio.cloned(), video.cloned())
}

/// Best audio encoding by the audio selection rules.
#[must_use]
pub fn select_audio(encodings: &[Encoding]) -> Option<&Encoding> {
    let preferred = encodings
        .iter()
        .filter(|e| e.is_audio_only() && is_preferred_container(&e.container));
    if let Some(best) = first_max_by(preferred, |a, b| {
        a.bitrate_rank().total_cmp(&b.bitrate_rank())
    }) {
        return Some(best);
    }

    let audio_only = encodings.iter().filter(|e| e.is_audio_only());
    first_max_by(audio_only, by_bitrate_then_size).or_else(|| fallback_muxed_audio(encodings))
}

/// Best muxed encoding to use as an audio source.
///
/// This is the last audio rule on its own. The orchestrator runs it again for
/// video jobs whose audio search came up empty.
#[must_use]
pub fn fallback_muxed_audio(encodings: &[Encoding]) -> Option<&Encoding> {
    first_max_by(encodings.iter().filter(|e| e.is_muxed()), by_bitrate_then_size)
}

/// Best video encoding for the requested quality label.
#[must_use]
pub fn select_video<'a>(encodings: &'a [Encoding], quality: &str) -> Option<&'a Encoding> {
    let mut candidates: Vec<(&Encoding, u32)> = encodings
        .iter()
        .filter(|e| e.is_video_only())
        .map(|e| (e, parse_resolution(e.resolution.as_deref().unwrap_or_default())))
        .collect();
    if candidates.is_empty() {
        candidates = encodings
            .iter()
            .filter(|e| e.is_muxed())
            .map(|e| (e, parse_resolution(e.resolution.as_deref().unwrap_or_default())))
            .collect();
    }

    let requested = parse_resolution(quality);
    if requested > 0 {
        if let Some((exact, _)) = candidates.iter().find(|(_, res)| *res == requested) {
            return Some(*exact);
        }
        // Closest above: smallest resolution >= requested, first in catalog order.
        let above = candidates
            .iter()
            .filter(|(_, res)| *res >= requested)
            .fold(None::<&(&Encoding, u32)>, |best, c| match best {
                Some(b) if b.1 <= c.1 => Some(b),
                _ => Some(c),
            });
        if let Some((enc, _)) = above {
            return Some(*enc);
        }
    }

    first_max_by(candidates.into_iter(), |a, b| a.1.cmp(&b.1)).map(|(e, _)| e)
}

/// Numeric resolution of a label such as `720p`, `1080p60` or `480`.
///
/// Digits immediately before a `p` marker win (whitespace allowed between),
/// then a leading integer. Anything else is 0.
#[must_use]
pub fn parse_resolution(label: &str) -> u32 {
    if let Some(caps) = RESOLUTION_LABEL.captures(label) {
        return caps[1].parse().unwrap_or(0);
    }
    let digits: String = label
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

fn is_preferred_container(container: &str) -> bool {
    PREFERRED_AUDIO_CONTAINERS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(container))
}

fn by_bitrate_then_size(a: &&Encoding, b: &&Encoding) -> Ordering {
    a.bitrate_rank()
        .total_cmp(&b.bitrate_rank())
        .then_with(|| a.size_or_zero().cmp(&b.size_or_zero()))
}

/// Maximum element keeping the *first* of equal maxima (`Iterator::max_by`
/// keeps the last).
fn first_max_by<T, I, F>(iter: I, mut compare: F) -> Option<T>
where
    I: Iterator<Item = T>,
    F: FnMut(&T, &T) -> Ordering,
{
    iter.fold(None, |best, item| match best {
        Some(b) if compare(&item, &b) != Ordering::Greater => Some(b),
        _ => Some(item),
    })
}
