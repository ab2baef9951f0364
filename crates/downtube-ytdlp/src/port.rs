//! Port implementations for [`YtDlpClient`].
//!
//! Maps adapter errors into `DownloadError` by where they happened:
//! metadata calls produce `Metadata`, transfers produce `Transfer`.

use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{StreamExt, future, stream};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tracing::debug;

use downtube_core::ports::{MetadataProvider, Transfer, TransferProvider};
use downtube_core::{
    DownloadError, DownloadResult, PlaylistId, PlaylistManifest, ResourceId, ResourceInfo,
    SelectorToken, StreamKind,
};

use crate::backend::JsonBackend;
use crate::client::YtDlpClient;
use crate::error::YtDlpError;
use crate::parsing::{parse_playlist, parse_resource};

#[async_trait]
impl<B: JsonBackend> MetadataProvider for YtDlpClient<B> {
    async fn fetch_resource(&self, id: &ResourceId) -> DownloadResult<ResourceInfo> {
        let args = self.resource_args(&id.canonical_url());
        let stdout = self
            .backend
            .run(&args)
            .await
            .map_err(YtDlpError::into_metadata)?;
        parse_resource(&stdout, id).map_err(YtDlpError::into_metadata)
    }

    async fn fetch_playlist(
        &self,
        id: &PlaylistId,
        limit: usize,
    ) -> DownloadResult<PlaylistManifest> {
        let args = self.playlist_args(&id.canonical_url(), limit);
        let stdout = self
            .backend
            .run(&args)
            .await
            .map_err(YtDlpError::into_metadata)?;
        let manifest = parse_playlist(&stdout, id).map_err(YtDlpError::into_metadata)?;
        debug!(playlist = %id, items = manifest.count(), "Fetched playlist manifest");
        Ok(manifest)
    }
}

#[async_trait]
impl<B: JsonBackend> TransferProvider for YtDlpClient<B> {
    /// Stream one format from yt-dlp's stdout.
    ///
    /// The child is killed if the stream is dropped early. A non-zero exit
    /// after the last byte surfaces as a final `Transfer` error item.
    async fn open(
        &self,
        id: &ResourceId,
        selector: &SelectorToken,
        kind: StreamKind,
    ) -> DownloadResult<Transfer> {
        let args = self.transfer_args(selector.as_str(), &id.canonical_url());
        debug!(resource = %id, %selector, %kind, "Spawning yt-dlp transfer");

        let mut child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| YtDlpError::spawn(&self.config.binary, e).into_transfer())?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::transfer("yt-dlp stdout was not captured"))?;
        let stderr = child.stderr.take().map(drain);

        let body = ReaderStream::new(stdout).map(|chunk| {
            chunk.map_err(|e| DownloadError::transfer(format!("reading yt-dlp output: {e}")))
        });
        let exit = stream::once(wait_for_exit(child, stderr))
            .filter_map(|result| future::ready(result.err().map(Err::<Bytes, _>)));

        Ok(Transfer::new(None, body.chain(exit).boxed()))
    }
}

/// Collect a pipe in the background so the child never blocks on it.
fn drain<R>(mut pipe: R) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf).await;
        buf
    })
}

async fn wait_for_exit(
    mut child: Child,
    stderr: Option<JoinHandle<Vec<u8>>>,
) -> DownloadResult<()> {
    let status = child
        .wait()
        .await
        .map_err(|e| DownloadError::transfer(format!("waiting for yt-dlp: {e}")))?;
    if status.success() {
        return Ok(());
    }
    let stderr = match stderr {
        Some(task) => task.await.unwrap_or_default(),
        None => Vec::new(),
    };
    Err(YtDlpError::exit(status, &stderr).into_transfer())
}
