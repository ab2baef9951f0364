//! CLI-specific error types and mappings.
//!
//! Maps `DownloadError` and settings problems onto exit codes and the
//! messages printed to the user.

use downtube_core::{DownloadError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A download or playlist run failed.
    #[error("{0}")]
    Download(#[from] DownloadError),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) | Self::Download(DownloadError::InvalidInput { .. }) => 2,
            Self::Download(DownloadError::EncoderUnavailable { .. }) => 69, // EX_UNAVAILABLE
            Self::Download(DownloadError::Write { .. }) | Self::Io(_) => 74, // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
            Self::Download(_) => 1,
        }
    }

    /// Message printed on stderr before exiting.
    pub fn user_message(&self) -> String {
        match self {
            Self::Download(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Exit code and message for an error that reached `main`.
///
/// Handlers return `anyhow::Result`; typed errors are recovered by downcast.
pub fn describe(err: &anyhow::Error) -> (i32, String) {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return (cli.exit_code(), cli.user_message());
    }
    if let Some(download) = err.downcast_ref::<DownloadError>() {
        let cli = CliError::Download(download.clone());
        return (cli.exit_code(), cli.user_message());
    }
    (1, format!("{err:#}"))
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
