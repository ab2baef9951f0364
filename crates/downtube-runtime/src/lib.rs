//! Process runtime for downtube.
//!
//! Hosts the ffmpeg-backed [`EncoderPort`](downtube_core::EncoderPort)
//! implementation and the lookup of the ffmpeg executable.

#![deny(unused_crate_dependencies)]

pub mod ffmpeg;

pub use ffmpeg::{
    BinarySource, FfmpegEncoder, FfmpegError, FfmpegInvocation, ResolvedBinary, resolve_ffmpeg,
};

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
