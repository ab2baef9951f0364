//! Playlist downloads.
//!
//! Applies the download orchestrator to a range or selection of playlist
//! items, strictly one after another. An item that fails is logged and
//! recorded; the remaining items still run.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, warn};

use downtube_core::download::{
    DownloadError, DownloadRequest, DownloadResult, MediaType, PlaylistManifest, ResourceId,
};
use downtube_core::paths::playlist_folder;

use crate::orchestrator::DownloadOrchestrator;

/// What every item of a collection run is downloaded as, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTarget {
    pub media_type: MediaType,
    pub quality: String,
    /// Parent directory; the playlist folder is created inside it.
    pub destination: PathBuf,
}

/// Outcome of one playlist item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Downloaded { path: PathBuf },
    Skipped,
    Failed { error: DownloadError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    /// 0-based index in the manifest.
    pub index: usize,
    pub title: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

/// Result of a collection run. The run itself succeeds even if items fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub folder: PathBuf,
    pub items: Vec<ItemOutcome>,
}

impl CollectionReport {
    pub fn downloaded(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Downloaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ItemStatus) -> bool) -> usize {
        self.items.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Runs playlist downloads on top of a [`DownloadOrchestrator`].
#[derive(Clone)]
pub struct CollectionOrchestrator {
    downloader: DownloadOrchestrator,
    target: CollectionTarget,
}

impl CollectionOrchestrator {
    pub const fn new(downloader: DownloadOrchestrator, target: CollectionTarget) -> Self {
        Self { downloader, target }
    }

    /// Download every item.
    pub async fn download_all(
        &self,
        manifest: &PlaylistManifest,
    ) -> DownloadResult<CollectionReport> {
        self.download_range(manifest, 0, None).await
    }

    /// Download items `start..=end` (0-based). `None` means the last item.
    ///
    /// Both bounds are clamped into the manifest; a range that is inverted
    /// after clamping is rejected rather than swapped.
    pub async fn download_range(
        &self,
        manifest: &PlaylistManifest,
        start: usize,
        end: Option<usize>,
    ) -> DownloadResult<CollectionReport> {
        let (start, end) = clamp_range(manifest, start, end)?;
        self.run(manifest, (start..=end).collect()).await
    }

    /// Download exactly the chosen items (0-based). Duplicates are dropped
    /// and items run in ascending order.
    pub async fn download_selection(
        &self,
        manifest: &PlaylistManifest,
        indices: &[usize],
    ) -> DownloadResult<CollectionReport> {
        if manifest.is_empty() {
            return Err(DownloadError::invalid_input("Playlist has no items"));
        }
        if indices.is_empty() {
            return Err(DownloadError::invalid_input("No items selected"));
        }
        let chosen: BTreeSet<usize> = indices.iter().copied().collect();
        if let Some(bad) = chosen.iter().find(|&&i| i >= manifest.count()) {
            return Err(DownloadError::invalid_input(format!(
                "Item {} is out of range (playlist has {} items)",
                bad + 1,
                manifest.count()
            )));
        }
        self.run(manifest, chosen.into_iter().collect()).await
    }

    async fn run(
        &self,
        manifest: &PlaylistManifest,
        indices: Vec<usize>,
    ) -> DownloadResult<CollectionReport> {
        let folder = playlist_folder(&self.target.destination, &manifest.title, &manifest.id);
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;

        info!(
            playlist = %manifest.id,
            title = %manifest.title,
            folder = %folder.display(),
            items = indices.len(),
            "Starting playlist download"
        );

        let mut items = Vec::with_capacity(indices.len());
        for index in indices {
            let item = &manifest.items[index];
            let position = index + 1;

            let Some(raw_id) = item.id.as_deref() else {
                warn!(position, title = %item.title, "Skipping playlist item without an id");
                items.push(ItemOutcome {
                    index,
                    title: item.title.clone(),
                    status: ItemStatus::Skipped,
                });
                continue;
            };

            let status = match self.download_item(raw_id, position, &folder).await {
                Ok(path) => ItemStatus::Downloaded { path },
                Err(e) => {
                    error!(position, title = %item.title, error = %e, "Playlist item failed");
                    ItemStatus::Failed { error: e }
                }
            };
            items.push(ItemOutcome {
                index,
                title: item.title.clone(),
                status,
            });
        }

        let report = CollectionReport { folder, items };
        info!(
            playlist = %manifest.id,
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Playlist download finished"
        );
        Ok(report)
    }

    async fn download_item(
        &self,
        raw_id: &str,
        position: usize,
        folder: &std::path::Path,
    ) -> DownloadResult<PathBuf> {
        let id = ResourceId::parse(raw_id)?;
        let request = DownloadRequest::new(id, self.target.media_type, folder)
            .with_quality(self.target.quality.clone());
        let job = self
            .downloader
            .prepare(request)
            .await?
            .with_position_prefix(position);
        self.downloader.download(&job).await
    }
}

fn clamp_range(
    manifest: &PlaylistManifest,
    start: usize,
    end: Option<usize>,
) -> DownloadResult<(usize, usize)> {
    let Some(last) = manifest.count().checked_sub(1) else {
        return Err(DownloadError::invalid_input("Playlist has no items"));
    };
    let start = start.min(last);
    let end = end.unwrap_or(last).min(last);
    if start > end {
        return Err(DownloadError::invalid_input(format!(
            "Invalid range: start {} is after end {}",
            start + 1,
            end + 1
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use downtube_core::download::{PlaylistId, PlaylistItem};

    fn manifest(n: usize) -> PlaylistManifest {
        PlaylistManifest {
            id: PlaylistId::parse("PLtestplaylist01").unwrap(),
            title: "Mix".to_string(),
            items: (0..n)
                .map(|i| PlaylistItem::new(format!("id{i}"), format!("Song {i}")))
                .collect(),
        }
    }

    #[test]
    fn test_clamp_range_defaults_to_last() {
        assert_eq!(clamp_range(&manifest(5), 1, None).unwrap(), (1, 4));
    }

    #[test]
    fn test_clamp_range_clamps_both_ends() {
        assert_eq!(clamp_range(&manifest(5), 9, Some(99)).unwrap(), (4, 4));
        assert_eq!(clamp_range(&manifest(5), 0, Some(99)).unwrap(), (0, 4));
    }

    #[test]
    fn test_clamp_range_rejects_inverted() {
        let err = clamp_range(&manifest(5), 3, Some(1)).unwrap_err();
        assert!(matches!(err, DownloadError::InvalidInput { .. }));
    }

    #[test]
    fn test_clamp_range_rejects_empty() {
        let err = clamp_range(&manifest(0), 0, None).unwrap_err();
        assert_eq!(err, DownloadError::invalid_input("Playlist has no items"));
    }

    #[test]
    fn test_report_counts() {
        let report = CollectionReport {
            folder: PathBuf::from("/x"),
            items: vec![
                ItemOutcome {
                    index: 0,
                    title: "a".into(),
                    status: ItemStatus::Downloaded {
                        path: PathBuf::from("/x/001 - a.mp4"),
                    },
                },
                ItemOutcome {
                    index: 1,
                    title: "b".into(),
                    status: ItemStatus::Skipped,
                },
                ItemOutcome {
                    index: 2,
                    title: "c".into(),
                    status: ItemStatus::Failed {
                        error: DownloadError::transfer("reset"),
                    },
                },
            ],
        };
        assert_eq!(
            (report.downloaded(), report.skipped(), report.failed()),
            (1, 1, 1)
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["items"][1]["status"], "skipped");
    }
}
