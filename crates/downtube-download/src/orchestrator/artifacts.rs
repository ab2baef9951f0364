//! Temporary artifact paths for one job run.
//!
//! Both files are created empty inside the destination directory before any
//! transfer starts, and are removed by [`TempArtifacts::release`] on every
//! exit path. If the run is dropped before it gets there, `Drop` removes them
//! synchronously. Fetchers only open files the guard already owns, so a
//! creation still in flight on the blocking pool cannot outlive the guard.
//! Removal problems are logged as cleanup warnings and never reach the caller.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use downtube_core::download::{DownloadError, DownloadResult};
use downtube_core::paths::temp_artifact_name;

/// Guard owning the video and audio artifact paths of a job.
#[derive(Debug)]
pub struct TempArtifacts {
    video: PathBuf,
    audio: PathBuf,
    released: bool,
}

impl TempArtifacts {
    /// Create two empty, collision-resistant files in `dir`.
    ///
    /// Creation is synchronous so that the guard exists before control
    /// returns to the executor. If the second file cannot be created the
    /// first is removed again.
    pub fn allocate(
        dir: &Path,
        video_container: &str,
        audio_container: &str,
    ) -> DownloadResult<Self> {
        let guard = Self {
            video: dir.join(unique_name(video_container)),
            audio: dir.join(unique_name(audio_container)),
            released: false,
        };
        create_empty(&guard.video)?;
        create_empty(&guard.audio)?;
        Ok(guard)
    }

    pub fn video(&self) -> &Path {
        &self.video
    }

    pub fn audio(&self) -> &Path {
        &self.audio
    }

    /// Remove both artifacts. Missing files are fine.
    pub async fn release(mut self) {
        for path in [&self.video, &self.audio] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => cleanup_warning(path, &e),
            }
        }
        self.released = true;
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        for path in [&self.video, &self.audio] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => cleanup_warning(path, &e),
            }
        }
    }
}

fn create_empty(path: &Path) -> DownloadResult<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(drop)
        .map_err(|e| DownloadError::from_io_error(&e))
}

fn unique_name(container: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    temp_artifact_name(millis, std::process::id(), &random[..8], container)
}

fn cleanup_warning(path: &Path, err: &std::io::Error) {
    warn!(
        path = %path.display(),
        error = %err,
        "Failed to remove temporary artifact"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_allocate_names_are_distinct_and_hidden() {
        let dir = TempDir::new().unwrap();
        let a = TempArtifacts::allocate(dir.path(), "mp4", "m4a").unwrap();
        let b = TempArtifacts::allocate(dir.path(), "mp4", "m4a").unwrap();

        assert_ne!(a.video(), b.video());
        assert_ne!(a.audio(), b.audio());
        let name = a.video().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".__tmp_"));
        assert!(name.ends_with(".mp4"));
        assert!(a.audio().to_string_lossy().ends_with(".m4a"));
        assert_eq!(a.video().parent(), Some(dir.path()));
        assert_eq!(std::fs::metadata(a.audio()).unwrap().len(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
    }

    #[test]
    fn test_allocate_in_missing_dir_is_write_error() {
        let dir = TempDir::new().unwrap();
        let err = TempArtifacts::allocate(&dir.path().join("gone"), "mp4", "m4a").unwrap_err();
        assert!(matches!(err, DownloadError::Write { .. }));
    }

    #[tokio::test]
    async fn test_release_removes_existing_and_ignores_missing() {
        let dir = TempDir::new().unwrap();
        let artifacts = TempArtifacts::allocate(dir.path(), "webm", "m4a").unwrap();
        std::fs::write(artifacts.video(), b"v").unwrap();
        std::fs::remove_file(artifacts.audio()).unwrap();
        let video = artifacts.video().to_path_buf();

        artifacts.release().await;

        assert!(!video.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_drop_removes_files() {
        let dir = TempDir::new().unwrap();
        {
            let artifacts = TempArtifacts::allocate(dir.path(), "mp4", "m4a").unwrap();
            std::fs::write(artifacts.video(), b"v").unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
