//! Error types for ffmpeg invocations.
//!
//! Kept local to the runtime crate and converted into `DownloadError` at the
//! port boundary.

use std::path::PathBuf;

use thiserror::Error;

use downtube_core::DownloadError;

/// Errors from probing or running ffmpeg.
#[derive(Debug, Error)]
pub enum FfmpegError {
    /// The executable could not be started.
    #[error("failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `ffmpeg -version` ran but failed.
    #[error("{} -version exited with {status}", path.display())]
    ProbeFailed { path: PathBuf, status: String },

    /// An encode ran and exited unsuccessfully.
    #[error("ffmpeg exited with {status}: {stderr}")]
    EncodeFailed { status: String, stderr: String },
}

impl FfmpegError {
    pub(crate) fn encode_failed(status: std::process::ExitStatus, stderr: &[u8]) -> Self {
        Self::EncodeFailed {
            status: status.to_string(),
            stderr: tail(&String::from_utf8_lossy(stderr), 20),
        }
    }

    /// Map a probe failure.
    pub fn into_unavailable(self) -> DownloadError {
        DownloadError::encoder_unavailable(self.to_string())
    }

    /// Map a failure during encode.
    pub fn into_merge_failed(self) -> DownloadError {
        DownloadError::merge_failed(self.to_string())
    }
}

/// Last `lines` non-empty lines of `text`, trimmed.
fn tail(text: &str, lines: usize) -> String {
    let kept: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n").trim().to_string()
}
