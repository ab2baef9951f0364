//! ffmpeg argument building.
//!
//! Turns an [`EncodeRequest`] into the argument list for one ffmpeg run.
//! Audio jobs transcode to MP3 with a VBR level; video jobs copy the video
//! stream and re-encode audio to AAC in an MP4 container. An optional
//! `arnndn` model adds noise reduction to the audio in both cases.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use downtube_core::EncodeRequest;

/// Bitrate of the AAC track in merged output.
pub const MERGE_AUDIO_BITRATE: &str = "192k";

/// Builder for one ffmpeg invocation.
///
/// # Example
///
/// ```
/// use downtube_core::{AudioQuality, EncodeRequest};
/// use downtube_runtime::FfmpegInvocation;
///
/// let request = EncodeRequest::TranscodeAudio {
///     input: "in.m4a".into(),
///     output: "out.mp3".into(),
///     quality: AudioQuality::High,
/// };
/// let args = FfmpegInvocation::new(&request).args();
/// assert_eq!(args.last().unwrap(), "out.mp3");
/// ```
#[derive(Debug, Clone)]
pub struct FfmpegInvocation<'a> {
    request: &'a EncodeRequest,
    denoise_model: Option<PathBuf>,
}

impl<'a> FfmpegInvocation<'a> {
    pub const fn new(request: &'a EncodeRequest) -> Self {
        Self {
            request,
            denoise_model: None,
        }
    }

    /// Apply an `arnndn` noise-reduction model to the audio track.
    #[must_use]
    pub fn denoise(mut self, model: Option<&Path>) -> Self {
        self.denoise_model = model.map(Path::to_path_buf);
        self
    }

    /// The full argument list, output path last.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        match self.request {
            EncodeRequest::TranscodeAudio {
                input,
                output,
                quality,
            } => {
                args.push("-i".into());
                args.push(input.into());
                args.push("-vn".into());
                self.push_filter(&mut args);
                args.extend(["-c:a", "libmp3lame", "-q:a"].map(OsString::from));
                args.push(quality.vbr_level().to_string().into());
                args.push(output.into());
            }
            EncodeRequest::Merge {
                video,
                audio,
                output,
            } => {
                args.push("-i".into());
                args.push(video.into());
                args.push("-i".into());
                args.push(audio.into());
                args.extend(["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy"].map(OsString::from));
                self.push_filter(&mut args);
                args.extend(["-c:a", "aac", "-b:a", MERGE_AUDIO_BITRATE].map(OsString::from));
                args.extend(["-movflags", "+faststart"].map(OsString::from));
                args.push(output.into());
            }
        }
        args
    }

    fn push_filter(&self, args: &mut Vec<OsString>) {
        if let Some(model) = &self.denoise_model {
            args.push("-af".into());
            let model = model.to_string_lossy();
            args.push(format!("arnndn=m={}", escape_filter_value(&model)).into());
        }
    }
}

/// Escape a filter option value for both ffmpeg parsing passes.
///
/// The option parser splits on `:`; the filtergraph parser splits on
/// `[],;`. Both treat `\` and `'` as escape and quote characters.
fn escape_filter_value(value: &str) -> String {
    let escape = |input: &str, special: &[char]| {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            if c == '\\' || c == '\'' || special.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        out
    };
    escape(&escape(value, &[':']), &['[', ']', ',', ';'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use downtube_core::AudioQuality;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_transcode_args() {
        let request = EncodeRequest::TranscodeAudio {
            input: PathBuf::from("/d/.__tmp_1-2-ab.m4a"),
            output: PathBuf::from("/d/Song.mp3"),
            quality: AudioQuality::Medium,
        };
        assert_eq!(
            strings(&FfmpegInvocation::new(&request).args()),
            vec![
                "-y",
                "-i",
                "/d/.__tmp_1-2-ab.m4a",
                "-vn",
                "-c:a",
                "libmp3lame",
                "-q:a",
                "4",
                "/d/Song.mp3",
            ]
        );
    }

    #[test]
    fn test_merge_args() {
        let request = EncodeRequest::Merge {
            video: PathBuf::from("v.mp4"),
            audio: PathBuf::from("a.m4a"),
            output: PathBuf::from("Clip.mp4"),
        };
        let args = strings(&FfmpegInvocation::new(&request).args());
        assert_eq!(&args[..5], ["-y", "-i", "v.mp4", "-i", "a.m4a"]);
        assert!(args.windows(2).any(|w| w == ["-c:v", "copy"]));
        assert!(args.windows(2).any(|w| w == ["-c:a", "aac"]));
        assert!(args.windows(2).any(|w| w == ["-b:a", "192k"]));
        assert!(args.windows(2).any(|w| w == ["-movflags", "+faststart"]));
        assert!(!args.contains(&"-af".to_string()));
        assert_eq!(args.last().unwrap(), "Clip.mp4");
    }

    #[test]
    fn test_denoise_filter_added_to_both_modes() {
        let model = Path::new("/models/sh.rnnn");
        let transcode = EncodeRequest::TranscodeAudio {
            input: PathBuf::from("a.m4a"),
            output: PathBuf::from("a.mp3"),
            quality: AudioQuality::Low,
        };
        let args = strings(&FfmpegInvocation::new(&transcode).denoise(Some(model)).args());
        let af = args.iter().position(|a| a == "-af").unwrap();
        assert_eq!(args[af + 1], "arnndn=m=/models/sh.rnnn");
        assert!(args.windows(2).any(|w| w == ["-q:a", "7"]));

        let merge = EncodeRequest::Merge {
            video: PathBuf::from("v.mp4"),
            audio: PathBuf::from("a.m4a"),
            output: PathBuf::from("o.mp4"),
        };
        let args = strings(&FfmpegInvocation::new(&merge).denoise(Some(model)).args());
        assert!(args.contains(&"-af".to_string()));
    }

    #[test]
    fn test_denoise_model_path_is_escaped() {
        let request = EncodeRequest::TranscodeAudio {
            input: PathBuf::from("a.m4a"),
            output: PathBuf::from("a.mp3"),
            quality: AudioQuality::High,
        };
        let args = strings(
            &FfmpegInvocation::new(&request)
                .denoise(Some(Path::new("C:/models/voice,v2.rnnn")))
                .args(),
        );
        let af = args.iter().position(|a| a == "-af").unwrap();
        assert_eq!(args[af + 1], r"arnndn=m=C\\:/models/voice\,v2.rnnn");
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("/models/sh.rnnn"), "/models/sh.rnnn");
        assert_eq!(escape_filter_value("a:b"), r"a\\:b");
        assert_eq!(escape_filter_value("it's"), r"it\\\'s");
        assert_eq!(escape_filter_value(r"C:\m"), r"C\\:\\\\m");
        assert_eq!(escape_filter_value("[x];y"), r"\[x\]\;y");
    }
}
