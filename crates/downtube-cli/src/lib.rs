//! Command-line interface for downtube.
//!
//! The `downtube` binary is a thin composition root: it parses flags,
//! layers settings, wires the yt-dlp and ffmpeg adapters into the download
//! engine, and dispatches to a handler.
//!
//! # Modules
//!
//! - [`parser`] - clap definitions
//! - [`bootstrap`] - settings layering and adapter wiring
//! - [`handlers`] - single video, playlist, and format listing
//! - [`presentation`] - progress rendering and table helpers
//! - [`error`] - exit codes and user-facing messages

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, load_settings};
pub use error::{CliError, describe};
pub use parser::{Cli, ItemRange, PlaylistSelection};
