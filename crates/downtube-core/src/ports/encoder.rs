//! Encoder port: the external process that transcodes or muxes artifacts.
//!
//! # Design
//!
//! - Core owns the trait and request types (pure)
//! - Runtime owns the implementation (spawns the encoder binary)
//! - CLI injects the encoder via the bootstrap

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::download::{AudioQuality, DownloadResult};

/// One encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeRequest {
    /// Transcode a single audio artifact to mp3.
    TranscodeAudio {
        input: PathBuf,
        output: PathBuf,
        quality: AudioQuality,
    },
    /// Copy the video stream and re-encode audio into an mp4 container.
    Merge {
        video: PathBuf,
        audio: PathBuf,
        output: PathBuf,
    },
}

impl EncodeRequest {
    /// File the encoder is asked to produce.
    #[must_use]
    pub fn output(&self) -> &Path {
        match self {
            Self::TranscodeAudio { output, .. } | Self::Merge { output, .. } => output,
        }
    }
}

/// Port for the external encoder.
#[async_trait]
pub trait EncoderPort: Send + Sync {
    /// Liveness check. Fails with `EncoderUnavailable` if the encoder cannot run.
    async fn probe(&self) -> DownloadResult<()>;

    /// Run the encoder once. A non-zero exit is `MergeFailed`.
    async fn encode(&self, request: &EncodeRequest) -> DownloadResult<()>;
}
