//! ffmpeg-backed encoder.
//!
//! # Structure
//!
//! - `resolve`: finds the executable
//! - `invocation`: builds argument lists from encode requests
//! - `error`: local errors mapped to `DownloadError`

mod error;
mod invocation;
mod resolve;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use downtube_core::{DownloadResult, EncodeRequest, EncoderPort};

pub use error::FfmpegError;
pub use invocation::{FfmpegInvocation, MERGE_AUDIO_BITRATE};
pub use resolve::{BinarySource, FFMPEG_ENV, ResolvedBinary, resolve_ffmpeg};

/// [`EncoderPort`] implementation running the ffmpeg executable.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    path: PathBuf,
    denoise_model: Option<PathBuf>,
}

impl FfmpegEncoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            denoise_model: None,
        }
    }

    /// Encoder for a resolved binary.
    pub fn from_resolved(resolved: ResolvedBinary) -> Self {
        Self::new(resolved.path)
    }

    /// Apply an `arnndn` noise-reduction model to every encode.
    #[must_use]
    pub fn with_denoise_model(mut self, model: Option<PathBuf>) -> Self {
        self.denoise_model = model;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_probe(&self) -> Result<(), FfmpegError> {
        let status = Command::new(&self.path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| FfmpegError::Spawn {
                path: self.path.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(FfmpegError::ProbeFailed {
                path: self.path.clone(),
                status: status.to_string(),
            })
        }
    }

    async fn run_encode(&self, request: &EncodeRequest) -> Result<(), FfmpegError> {
        let args = FfmpegInvocation::new(request)
            .denoise(self.denoise_model.as_deref())
            .args();
        debug!(ffmpeg = %self.path.display(), ?args, "Running ffmpeg");

        let output = Command::new(&self.path)
            .args(["-hide_banner", "-nostdin"])
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| FfmpegError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FfmpegError::encode_failed(output.status, &output.stderr))
        }
    }
}

#[async_trait]
impl EncoderPort for FfmpegEncoder {
    async fn probe(&self) -> DownloadResult<()> {
        self.run_probe().await.map_err(|e| {
            warn!(ffmpeg = %self.path.display(), error = %e, "ffmpeg probe failed");
            e.into_unavailable()
        })
    }

    async fn encode(&self, request: &EncodeRequest) -> DownloadResult<()> {
        self.run_encode(request)
            .await
            .map_err(FfmpegError::into_merge_failed)
    }
}
