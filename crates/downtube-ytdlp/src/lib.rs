//! yt-dlp adapter for downtube.
//!
//! Implements the core [`MetadataProvider`](downtube_core::MetadataProvider)
//! and [`TransferProvider`](downtube_core::TransferProvider) ports by running
//! the `yt-dlp` executable. Metadata comes from its JSON dump; transfers
//! stream the selected format from its stdout.
//!
//! # Structure
//!
//! - `config`: public builder for the client
//! - `error`: adapter-local errors, mapped to `DownloadError` at the port
//! - `models`: serde shapes of the yt-dlp JSON
//! - `parsing`: JSON to domain conversion
//! - `backend`: process execution seam, faked in tests
//! - `client`: argument building and the client type
//! - `port`: port trait implementations

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultYtDlpClient is used through the ports, not its generic structure.
#![allow(private_interfaces)]

mod backend;
mod client;
mod config;
mod error;
mod models;
mod parsing;
mod port;

// ============================================================================
// Public API
// ============================================================================

pub use client::DefaultYtDlpClient;
pub use config::YtDlpConfig;
pub use error::{YtDlpError, YtDlpResult};

#[cfg(test)]
use tokio_test as _;
