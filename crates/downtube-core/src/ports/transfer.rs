//! Transfer provider port.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use std::fmt;

use crate::download::{DownloadResult, ResourceId, SelectorToken, StreamKind};

/// Stream of received chunks. An `Err` item ends the transfer.
pub type ChunkStream = BoxStream<'static, DownloadResult<Bytes>>;

/// An open transfer for one encoding.
pub struct Transfer {
    /// Total size announced by the provider, if any.
    pub total: Option<u64>,
    pub chunks: ChunkStream,
}

impl Transfer {
    pub fn new(total: Option<u64>, chunks: ChunkStream) -> Self {
        Self { total, chunks }
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transfer")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// Port for obtaining the bytes of one encoding.
#[async_trait]
pub trait TransferProvider: Send + Sync {
    /// Open a transfer for `selector`, restricted to the given stream kind.
    ///
    /// Protocol and network failures, both here and mid-stream, are
    /// [`DownloadError::Transfer`](crate::DownloadError::Transfer).
    async fn open(
        &self,
        id: &ResourceId,
        selector: &SelectorToken,
        kind: StreamKind,
    ) -> DownloadResult<Transfer>;
}
