//! Stream fetcher: one encoding, one local artifact.
//!
//! The fetcher owns its transfer state exclusively. Progress leaves it only
//! through the callback, as the fetcher's own cumulative byte count; summing
//! across fetchers is the orchestrator's job.
//!
//! The destination file must already exist; the fetcher truncates it and
//! never creates one. On failure the file is left where it is. Creating and
//! removing it belong to whoever allocated the path.
//!
//! # Cancellation
//!
//! [`StreamFetcher::fetch_until`] stops at the next chunk boundary once its
//! token is cancelled. File operations already started are awaited, so a
//! cancelled fetch leaves nothing running in the background.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use downtube_core::download::{DownloadError, DownloadResult, Encoding, ResourceId, StreamKind};
use downtube_core::ports::{Transfer, TransferProvider};

/// Callback receiving a fetcher's cumulative byte count after every chunk.
pub type FetchProgress<'a> = &'a (dyn Fn(u64) + Send + Sync);

/// Per-fetch counters.
#[derive(Debug, Clone, Copy)]
pub struct TransferState {
    /// Bytes received so far.
    pub received: u64,
    /// Rate over the most recent chunk, bytes per second.
    pub last_rate_bps: f64,
    last_chunk_at: Instant,
}

impl TransferState {
    fn new() -> Self {
        Self {
            received: 0,
            last_rate_bps: 0.0,
            last_chunk_at: Instant::now(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self, chunk_len: usize) {
        let now = Instant::now();
        let secs = now.saturating_duration_since(self.last_chunk_at).as_secs_f64();
        if secs > 0.0 {
            self.last_rate_bps = chunk_len as f64 / secs;
        }
        self.last_chunk_at = now;
        self.received += chunk_len as u64;
    }
}

/// Downloads one selected encoding into a local file.
#[derive(Clone)]
pub struct StreamFetcher {
    transfer: Arc<dyn TransferProvider>,
}

impl StreamFetcher {
    pub fn new(transfer: Arc<dyn TransferProvider>) -> Self {
        Self { transfer }
    }

    /// Fetch `encoding` into the existing file at `destination`.
    ///
    /// Returns the number of bytes written. Provider failures (at open or
    /// mid-stream) surface as `Transfer`; local file failures as `Write`.
    pub async fn fetch(
        &self,
        id: &ResourceId,
        encoding: &Encoding,
        kind: StreamKind,
        destination: &Path,
        on_progress: FetchProgress<'_>,
    ) -> DownloadResult<u64> {
        self.fetch_until(
            id,
            encoding,
            kind,
            destination,
            on_progress,
            &CancellationToken::new(),
        )
        .await
    }

    /// [`fetch`](Self::fetch) that gives up with `Transfer` once `cancel` fires.
    pub async fn fetch_until(
        &self,
        id: &ResourceId,
        encoding: &Encoding,
        kind: StreamKind,
        destination: &Path,
        on_progress: FetchProgress<'_>,
        cancel: &CancellationToken,
    ) -> DownloadResult<u64> {
        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled(kind)),
            opened = self.transfer.open(id, &encoding.selector, kind) => opened,
        };
        let Transfer { total, mut chunks } = opened?;
        debug!(
            resource = %id,
            selector = %encoding.selector,
            %kind,
            announced_total = ?total,
            path = %destination.display(),
            "Transfer opened"
        );

        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(destination)
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;

        let mut state = TransferState::new();
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(kind)),
                next = chunks.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::from_io_error(&e))?;
            state.record(chunk.len());
            on_progress(state.received);
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;

        debug!(
            resource = %id,
            %kind,
            bytes = state.received,
            last_rate_bps = state.last_rate_bps,
            "Transfer complete"
        );
        Ok(state.received)
    }
}

fn cancelled(kind: StreamKind) -> DownloadError {
    DownloadError::transfer(format!("{kind} transfer cancelled"))
}
