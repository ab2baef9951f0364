//! Download orchestration for a single resource.
//!
//! The orchestrator operates on value types (`DownloadJob`) and cloned Arc
//! dependencies. One call to [`DownloadOrchestrator::download`] owns
//! everything it creates: the progress aggregator, the byte counters, and
//! the temporary artifacts.
//!
//! # Pipeline
//!
//! 1. Ensure the destination directory exists
//! 2. Probe the encoder (no transfer starts if it is missing)
//! 3. Resolve formats and reject jobs missing a required stream
//! 4. Create the temporary artifacts
//! 5. Fetch streams concurrently while aggregating progress
//! 6. Stop progress, then encode
//! 7. Remove the artifacts, whatever happened

mod artifacts;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use downtube_core::download::{
    AudioQuality, DownloadError, DownloadJob, DownloadRequest, DownloadResult, Encoding,
    MediaType, StreamKind,
};
use downtube_core::ports::{
    EncodeRequest, EncoderPort, MetadataProvider, ProgressSink, TransferProvider,
};

use crate::fetcher::StreamFetcher;
use crate::format_resolver::{fallback_muxed_audio, select_formats};
use crate::progress::{DEFAULT_THROTTLE_INTERVAL, ProgressAggregator, ProgressThrottle};

pub use artifacts::TempArtifacts;

/// Dependencies for the download orchestrator.
///
/// These are cloned Arc references to ports, wired by the composition root.
#[derive(Clone)]
pub struct OrchestratorDeps {
    pub metadata: Arc<dyn MetadataProvider>,
    pub transfer: Arc<dyn TransferProvider>,
    pub encoder: Arc<dyn EncoderPort>,
    pub progress: Arc<dyn ProgressSink>,
}

/// Streams a job will fetch, after resolution and fallback.
#[derive(Debug, Clone)]
struct StreamPlan {
    audio: Encoding,
    video: Option<Encoding>,
}

impl StreamPlan {
    fn for_job(job: &DownloadJob) -> DownloadResult<Self> {
        let selection = select_formats(&job.catalog, job.media_type, &job.quality);
        match job.media_type {
            MediaType::Audio => {
                let audio = selection
                    .audio
                    .ok_or_else(|| DownloadError::no_format(StreamKind::AudioOnly))?;
                Ok(Self { audio, video: None })
            }
            MediaType::Video => {
                let video = selection
                    .video
                    .ok_or_else(|| DownloadError::no_format(StreamKind::VideoOnly))?;
                let audio = match selection.audio {
                    Some(audio) => audio,
                    None => fallback_muxed_audio(&job.catalog)
                        .cloned()
                        .ok_or_else(|| DownloadError::no_format(StreamKind::AudioOnly))?,
                };
                Ok(Self {
                    audio,
                    video: Some(video),
                })
            }
        }
    }

    fn expected_bytes(&self) -> u64 {
        self.audio.size_or_zero() + self.video.as_ref().map_or(0, Encoding::size_or_zero)
    }

    fn video_container(&self) -> &str {
        self.video.as_ref().map_or(StreamKind::VideoOnly.default_container(), |v| {
            v.artifact_container(StreamKind::VideoOnly)
        })
    }
}

/// Runs single-resource download jobs end to end.
#[derive(Clone)]
pub struct DownloadOrchestrator {
    metadata: Arc<dyn MetadataProvider>,
    fetcher: StreamFetcher,
    encoder: Arc<dyn EncoderPort>,
    progress: Arc<dyn ProgressSink>,
    throttle_interval: Duration,
}

impl DownloadOrchestrator {
    pub fn new(deps: OrchestratorDeps) -> Self {
        Self {
            metadata: deps.metadata,
            fetcher: StreamFetcher::new(deps.transfer),
            encoder: deps.encoder,
            progress: deps.progress,
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
        }
    }

    /// Override the minimum gap between rendered progress updates.
    #[must_use]
    pub const fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    /// Fetch metadata for a request and turn it into a job.
    ///
    /// Metadata failures propagate unchanged.
    pub async fn prepare(&self, request: DownloadRequest) -> DownloadResult<DownloadJob> {
        let info = self.metadata.fetch_resource(&request.id).await?;
        debug!(
            resource = %info.id,
            title = %info.title,
            encodings = info.encodings.len(),
            "Fetched resource metadata"
        );
        Ok(DownloadJob::from_info(request, info))
    }

    /// Run a job and return the path of the produced file.
    ///
    /// Temporary artifacts are gone when this returns, on success and on
    /// failure. If the future is dropped midway, the artifact guard removes
    /// them synchronously.
    pub async fn download(&self, job: &DownloadJob) -> DownloadResult<PathBuf> {
        let started = Instant::now();
        info!(
            resource = %job.id,
            media_type = %job.media_type,
            quality = %job.quality,
            title = %job.title,
            "Starting download"
        );

        match self.execute(job).await {
            Ok(path) => {
                info!(
                    resource = %job.id,
                    path = %path.display(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "Download complete"
                );
                Ok(path)
            }
            Err(e) => {
                error!(resource = %job.id, error = %e, "Download failed");
                Err(e)
            }
        }
    }

    async fn execute(&self, job: &DownloadJob) -> DownloadResult<PathBuf> {
        tokio::fs::create_dir_all(&job.destination)
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;

        self.encoder.probe().await?;

        let plan = StreamPlan::for_job(job)?;
        debug!(
            resource = %job.id,
            audio = %plan.audio.selector,
            video = ?plan.video.as_ref().map(|v| v.selector.as_str()),
            expected_bytes = plan.expected_bytes(),
            "Formats selected"
        );

        let artifacts = TempArtifacts::allocate(
            &job.destination,
            plan.video_container(),
            plan.audio.artifact_container(StreamKind::AudioOnly),
        )?;
        let result = self.transfer_and_encode(job, &plan, &artifacts).await;
        artifacts.release().await;
        result
    }

    async fn transfer_and_encode(
        &self,
        job: &DownloadJob,
        plan: &StreamPlan,
        artifacts: &TempArtifacts,
    ) -> DownloadResult<PathBuf> {
        let aggregator = Mutex::new(ProgressAggregator::with_throttle(
            Arc::clone(&self.progress),
            ProgressThrottle::new(self.throttle_interval),
        ));
        lock(&aggregator).start(plan.expected_bytes());
        let fetched = self.fetch_streams(job, plan, artifacts, &aggregator).await;
        lock(&aggregator).stop();
        fetched?;

        let output = job.final_path();
        let request = match plan.video {
            None => EncodeRequest::TranscodeAudio {
                input: artifacts.audio().to_path_buf(),
                output: output.clone(),
                quality: AudioQuality::from_label(&job.quality).unwrap_or_default(),
            },
            Some(_) => EncodeRequest::Merge {
                video: artifacts.video().to_path_buf(),
                audio: artifacts.audio().to_path_buf(),
                output: output.clone(),
            },
        };
        self.encoder.encode(&request).await?;

        let exists = tokio::fs::try_exists(&output).await;
        confirm_output(exists, output)
    }

    /// Fetch the planned streams, concurrently for video jobs.
    ///
    /// The first failure cancels the sibling; both are awaited before
    /// returning so no file operation outlives this call. The error
    /// reported is the first one that occurred.
    async fn fetch_streams(
        &self,
        job: &DownloadJob,
        plan: &StreamPlan,
        artifacts: &TempArtifacts,
        aggregator: &Mutex<ProgressAggregator>,
    ) -> DownloadResult<()> {
        let video_bytes = AtomicU64::new(0);
        let audio_bytes = AtomicU64::new(0);

        // Both counters are read under the aggregator lock, so forwarded
        // totals never decrease.
        let forward = || {
            let mut agg = lock(aggregator);
            let total = video_bytes.load(Ordering::SeqCst) + audio_bytes.load(Ordering::SeqCst);
            agg.update(total);
        };
        let on_video = |n: u64| {
            video_bytes.store(n, Ordering::SeqCst);
            forward();
        };
        let on_audio = |n: u64| {
            audio_bytes.store(n, Ordering::SeqCst);
            forward();
        };

        let cancel = CancellationToken::new();
        let first_failure: OnceLock<DownloadError> = OnceLock::new();
        let settle = |result: DownloadResult<u64>| {
            if let Err(e) = &result {
                let _ = first_failure.set(e.clone());
                cancel.cancel();
            }
            result
        };

        let audio_fetch = async {
            settle(
                self.fetcher
                    .fetch_until(
                        &job.id,
                        &plan.audio,
                        StreamKind::AudioOnly,
                        artifacts.audio(),
                        &on_audio,
                        &cancel,
                    )
                    .await,
            )
        };

        match &plan.video {
            None => {
                audio_fetch.await?;
            }
            Some(video) => {
                let video_fetch = async {
                    settle(
                        self.fetcher
                            .fetch_until(
                                &job.id,
                                video,
                                StreamKind::VideoOnly,
                                artifacts.video(),
                                &on_video,
                                &cancel,
                            )
                            .await,
                    )
                };
                let (video_result, audio_result) = tokio::join!(video_fetch, audio_fetch);
                if let Some(err) = first_failure.get() {
                    return Err(err.clone());
                }
                video_result?;
                audio_result?;
            }
        }

        debug!(
            resource = %job.id,
            video_bytes = video_bytes.load(Ordering::SeqCst),
            audio_bytes = audio_bytes.load(Ordering::SeqCst),
            "Streams fetched"
        );
        Ok(())
    }
}

/// Accept the encoder's output only if it is known to exist.
fn confirm_output(exists: std::io::Result<bool>, output: PathBuf) -> DownloadResult<PathBuf> {
    match exists {
        Ok(true) => Ok(output),
        Ok(false) => Err(DownloadError::merge_failed(format!(
            "encoder reported success but {} was not created",
            output.display()
        ))),
        Err(e) => Err(DownloadError::merge_failed(format!(
            "could not check {} after encoding: {e}",
            output.display()
        ))),
    }
}

fn lock(aggregator: &Mutex<ProgressAggregator>) -> MutexGuard<'_, ProgressAggregator> {
    aggregator.lock().unwrap_or_else(PoisonError::into_inner)
}
