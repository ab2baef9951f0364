//! Download error types.
//!
//! These errors are designed to be serializable and not depend on external
//! error types like `std::io::Error`. For I/O errors, we capture the kind
//! and message as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::StreamKind;

/// Error type for download operations.
///
/// Every variant aborts the job that raised it. Cleanup problems are not
/// represented here: they are logged as warnings and never propagate.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// Malformed resource or playlist identifier, bad range, bad options.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The catalog has no encoding suitable for a required stream.
    #[error("No {kind} format found for this resource")]
    NoFormatFound {
        /// The stream that could not be satisfied.
        kind: StreamKind,
    },

    /// The external encoder could not be started.
    #[error("Encoder unavailable: {message}")]
    EncoderUnavailable {
        /// Detailed error message.
        message: String,
    },

    /// Network or provider failure while transferring bytes.
    #[error("Transfer error: {message}")]
    Transfer {
        /// Detailed error message.
        message: String,
    },

    /// Local filesystem failure while writing an artifact.
    #[error("Write error ({kind}): {message}")]
    Write {
        /// The kind of I/O error (e.g., "`NotFound`", "`PermissionDenied`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The encoder ran but did not produce the output file.
    #[error("Merge failed: {message}")]
    MergeFailed {
        /// Exit status and captured diagnostics.
        message: String,
    },

    /// The metadata provider failed to describe a resource or playlist.
    #[error("Metadata error: {message}")]
    Metadata {
        /// Detailed error message.
        message: String,
    },
}

impl DownloadError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a "no format found" error for the given stream.
    #[must_use]
    pub const fn no_format(kind: StreamKind) -> Self {
        Self::NoFormatFound { kind }
    }

    /// Create an encoder unavailable error.
    pub fn encoder_unavailable(message: impl Into<String>) -> Self {
        Self::EncoderUnavailable {
            message: message.into(),
        }
    }

    /// Create a transfer error.
    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
        }
    }

    /// Create a write error from kind and message strings.
    pub fn write(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a write error from a `std::io::Error`.
    ///
    /// This captures the error kind name and message for serialization.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Write {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a merge failed error.
    pub fn merge_failed(message: impl Into<String>) -> Self {
        Self::MergeFailed {
            message: message.into(),
        }
    }

    /// Create a metadata error.
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => message.clone(),
            Self::NoFormatFound { kind } => {
                format!("No {kind} format found for this video.")
            }
            Self::EncoderUnavailable { .. } => "ffmpeg not found. Please install ffmpeg and ensure it is available \
                 (e.g. `sudo apt install ffmpeg`), or point DOWNTUBE_FFMPEG at the binary."
                .to_string(),
            Self::Transfer { message } => format!("Download failed: {message}"),
            Self::Write { message, .. } => format!("File operation failed: {message}"),
            Self::MergeFailed { message } => format!("ffmpeg failed: {message}"),
            Self::Metadata { message } => format!("Failed to fetch info: {message}"),
        }
    }
}

/// Convenience result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
        let err = DownloadError::from_io_error(&io_err);

        match err {
            DownloadError::Write { kind, message } => {
                assert_eq!(kind, "PermissionDenied");
                assert!(message.contains("read-only fs"));
            }
            _ => panic!("Expected Write variant"),
        }
    }

    #[test]
    fn test_error_serialization() {
        let err = DownloadError::no_format(StreamKind::VideoOnly);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("NoFormatFound"));

        let parsed: DownloadError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }

    #[test]
    fn test_display_names_stream() {
        let err = DownloadError::no_format(StreamKind::AudioOnly);
        assert_eq!(err.to_string(), "No audio format found for this resource");
    }

    #[test]
    fn test_user_messages() {
        let err = DownloadError::encoder_unavailable("No such file or directory");
        assert!(err.user_message().contains("ffmpeg"));
        assert!(err.user_message().contains("DOWNTUBE_FFMPEG"));
    }
}
