//! Single video download.

use anyhow::Result;

use downtube_core::{DownloadOptions, DownloadRequest, ResourceId};

use crate::bootstrap::CliContext;

/// Download one resource and print where it was saved.
///
/// # Errors
///
/// Returns the `DownloadError` of the first failing step: URL parsing,
/// metadata, format resolution, transfer, or encoding.
pub async fn execute(ctx: &CliContext, url: &str, options: &DownloadOptions) -> Result<()> {
    let id = ResourceId::parse(url)?;
    let request = DownloadRequest::new(id, options.media_type, &options.output)
        .with_quality(options.quality.as_str());

    let job = ctx.downloader().prepare(request).await?;
    println!("Downloading {}: {} ({})", job.media_type, job.title, job.quality);

    let path = ctx.downloader().download(&job).await?;
    println!("Saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap;
    use downtube_core::{DownloadError, MediaType, Settings};
    use std::path::PathBuf;

    #[test]
    fn test_invalid_url_fails_before_any_work() {
        let ctx = bootstrap(Settings::with_defaults());
        let options = DownloadOptions {
            media_type: MediaType::Video,
            quality: "360p".to_string(),
            output: PathBuf::from("."),
        };

        let err = tokio_test::block_on(execute(&ctx, "https://example.com/watch?v=nope", &options))
            .unwrap_err();
        let err = err.downcast::<DownloadError>().unwrap();
        assert!(matches!(err, DownloadError::InvalidInput { .. }));
    }
}
