//! Playlist downloads.

use anyhow::Result;

use downtube_core::{DownloadOptions, PlaylistId};
use downtube_download::{CollectionOrchestrator, CollectionReport, CollectionTarget, ItemStatus};

use crate::bootstrap::CliContext;
use crate::parser::PlaylistSelection;
use crate::presentation::{print_separator, truncate_string};

/// Fetch the playlist manifest and download the selected items in order.
///
/// Individual item failures are reported in the summary; the command only
/// fails when the playlist itself cannot be fetched or the selection is
/// invalid.
pub async fn execute(
    ctx: &CliContext,
    url: &str,
    options: &DownloadOptions,
    selection: &PlaylistSelection,
) -> Result<()> {
    let id = PlaylistId::parse(url)?;
    let limit = ctx.settings.effective_playlist_limit() as usize;
    let manifest = ctx.metadata().fetch_playlist(&id, limit).await?;
    println!("Playlist: {} ({} items)", manifest.title, manifest.count());

    let collection = CollectionOrchestrator::new(
        ctx.downloader().clone(),
        CollectionTarget {
            media_type: options.media_type,
            quality: options.quality.clone(),
            destination: options.output.clone(),
        },
    );

    let report = match selection {
        PlaylistSelection::All => collection.download_all(&manifest).await?,
        PlaylistSelection::Range(range) => {
            let (start, end) = range.to_zero_based();
            collection.download_range(&manifest, start, end).await?
        }
        PlaylistSelection::Items(items) => {
            collection
                .download_selection(&manifest, &zero_based(items))
                .await?
        }
    };

    print_report(&report);
    Ok(())
}

/// Convert 1-based item numbers from the command line.
fn zero_based(items: &[usize]) -> Vec<usize> {
    items.iter().map(|n| n.saturating_sub(1)).collect()
}

fn status_label(status: &ItemStatus) -> String {
    match status {
        ItemStatus::Downloaded { .. } => "ok".to_string(),
        ItemStatus::Skipped => "skipped".to_string(),
        ItemStatus::Failed { error } => format!("failed: {}", error.user_message()),
    }
}

fn print_report(report: &CollectionReport) {
    println!();
    println!("{:<5} {:<45} Status", "#", "Title");
    print_separator(80);
    for item in &report.items {
        println!(
            "{:<5} {:<45} {}",
            item.index + 1,
            truncate_string(&item.title, 44),
            status_label(&item.status)
        );
    }
    print_separator(80);
    println!(
        "{} downloaded, {} skipped, {} failed -> {}",
        report.downloaded(),
        report.skipped(),
        report.failed(),
        report.folder.display()
    );
}
