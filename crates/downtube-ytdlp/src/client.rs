//! yt-dlp client: configuration plus argument building.

use crate::backend::{JsonBackend, ProcessBackend};
use crate::config::YtDlpConfig;

/// Default client running the real executable.
pub type DefaultYtDlpClient = YtDlpClient<ProcessBackend>;

/// Client for the yt-dlp executable.
///
/// Generic over the metadata backend so the port implementation can be
/// tested with canned output. Use [`DefaultYtDlpClient`] in production.
pub struct YtDlpClient<B: JsonBackend> {
    pub(crate) backend: B,
    pub(crate) config: YtDlpConfig,
}

impl DefaultYtDlpClient {
    pub fn new(config: YtDlpConfig) -> Self {
        Self {
            backend: ProcessBackend::new(config.binary.clone()),
            config,
        }
    }
}

impl<B: JsonBackend> YtDlpClient<B> {
    #[cfg(test)]
    pub(crate) const fn with_backend(config: YtDlpConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// Arguments for a single-video JSON dump.
    pub(crate) fn resource_args(&self, url: &str) -> Vec<String> {
        self.with_common(["-J", "--no-playlist"], url)
    }

    /// Arguments for a flat playlist dump of at most `limit` entries.
    pub(crate) fn playlist_args(&self, url: &str, limit: usize) -> Vec<String> {
        let limit = limit.max(1).to_string();
        self.with_common(["-J", "--flat-playlist", "--playlist-end", &limit], url)
    }

    /// Arguments streaming one format to stdout.
    pub(crate) fn transfer_args(&self, selector: &str, url: &str) -> Vec<String> {
        self.with_common(["-f", selector, "-o", "-", "--no-playlist", "--no-part"], url)
    }

    fn with_common<'a>(&self, specific: impl IntoIterator<Item = &'a str>, url: &str) -> Vec<String> {
        let mut args: Vec<String> = ["--quiet", "--no-warnings"]
            .into_iter()
            .map(String::from)
            .collect();
        args.extend(self.config.extra_args.iter().cloned());
        args.extend(specific.into_iter().map(String::from));
        args.push(url.to_string());
        args
    }
}
