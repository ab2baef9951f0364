//! Adapter-local error types.
//!
//! These errors stay inside `downtube-ytdlp` and are mapped to
//! [`DownloadError`] at the port boundary, where it is known whether the
//! failure happened while reading metadata or while transferring bytes.

use thiserror::Error;

use downtube_core::DownloadError;

/// Result type alias for yt-dlp operations.
pub type YtDlpResult<T> = Result<T, YtDlpError>;

/// Errors from running yt-dlp or reading its output.
#[derive(Debug, Error)]
pub enum YtDlpError {
    /// The executable could not be started.
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        /// Executable that was attempted
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// yt-dlp ran but exited unsuccessfully.
    #[error("yt-dlp {status}: {stderr}")]
    Exit {
        /// Rendered exit status
        status: String,
        /// Trimmed diagnostics from stderr
        stderr: String,
    },

    /// The output was readable JSON but not what was expected.
    #[error("Invalid response from yt-dlp: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl YtDlpError {
    pub(crate) fn spawn(binary: &std::path::Path, source: std::io::Error) -> Self {
        Self::Spawn {
            binary: binary.display().to_string(),
            source,
        }
    }

    pub(crate) fn exit(status: std::process::ExitStatus, stderr: &[u8]) -> Self {
        Self::Exit {
            status: status.to_string(),
            stderr: last_error_line(&String::from_utf8_lossy(stderr)),
        }
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Whether the executable itself is missing.
    pub fn is_missing_binary(&self) -> bool {
        matches!(self, Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    /// Map a failure that happened while fetching metadata.
    pub fn into_metadata(self) -> DownloadError {
        DownloadError::metadata(self.describe())
    }

    /// Map a failure that happened while transferring a stream.
    pub fn into_transfer(self) -> DownloadError {
        DownloadError::transfer(self.describe())
    }

    fn describe(&self) -> String {
        match self {
            Self::Exit { stderr, .. } if !stderr.is_empty() => stderr.clone(),
            other if other.is_missing_binary() => {
                format!("{other}. Install yt-dlp or set DOWNTUBE_YTDLP to its path")
            }
            other => other.to_string(),
        }
    }
}

/// yt-dlp prints warnings before the error that matters; keep the last
/// `ERROR:` line if there is one, otherwise the whole trimmed text.
fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))
        .map_or_else(|| stderr.trim().to_string(), |msg| msg.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_error_line_prefers_error_marker() {
        let stderr = "WARNING: something odd\nERROR: [youtube] abc: Video unavailable\n";
        assert_eq!(last_error_line(stderr), "[youtube] abc: Video unavailable");
    }

    #[test]
    fn test_last_error_line_falls_back_to_text() {
        assert_eq!(last_error_line("  boom \n"), "boom");
        assert_eq!(last_error_line(""), "");
    }

    #[test]
    fn test_missing_binary_hint() {
        let err = YtDlpError::spawn(
            std::path::Path::new("yt-dlp"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.is_missing_binary());

        let mapped = err.into_metadata();
        assert!(matches!(mapped, DownloadError::Metadata { .. }));
        assert!(mapped.to_string().contains("DOWNTUBE_YTDLP"));
    }

    #[test]
    fn test_exit_maps_to_stderr_message() {
        let err = YtDlpError::Exit {
            status: "exit status: 1".to_string(),
            stderr: "HTTP Error 403: Forbidden".to_string(),
        };
        assert_eq!(
            err.into_transfer(),
            DownloadError::transfer("HTTP Error 403: Forbidden")
        );
    }

    #[test]
    fn test_invalid_response_message() {
        let err = YtDlpError::invalid_response("missing formats");
        assert!(err.to_string().contains("missing formats"));
        assert!(matches!(
            err.into_metadata(),
            DownloadError::Metadata { .. }
        ));
    }
}
