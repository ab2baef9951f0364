//! Public configuration for the yt-dlp client.

use std::path::PathBuf;

/// Configuration for the yt-dlp client.
///
/// # Example
///
/// ```
/// use downtube_ytdlp::YtDlpConfig;
///
/// let config = YtDlpConfig::new()
///     .with_binary("/usr/local/bin/yt-dlp")
///     .with_extra_arg("--force-ipv4");
/// ```
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Executable to run
    pub(crate) binary: PathBuf,
    /// Arguments inserted before every invocation's own arguments
    pub(crate) extra_args: Vec<String>,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            extra_args: Vec::new(),
        }
    }
}

impl YtDlpConfig {
    /// Create a configuration that runs `yt-dlp` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the executable path.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the executable path if one is given, otherwise keep the current one.
    #[must_use]
    pub fn with_optional_binary(mut self, binary: Option<PathBuf>) -> Self {
        if let Some(binary) = binary {
            self.binary = binary;
        }
        self
    }

    /// Append an argument passed to every invocation.
    #[must_use]
    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// The configured executable.
    pub fn binary(&self) -> &std::path::Path {
        &self.binary
    }
}
