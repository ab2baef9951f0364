//! Hand-written fakes for the download ports.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream;

use downtube_core::download::{
    DownloadError, DownloadResult, Encoding, PlaylistId, PlaylistManifest, ProgressSnapshot,
    ResourceId, ResourceInfo, SelectorToken, StreamKind,
};
use downtube_core::ports::{
    EncodeRequest, EncoderPort, MetadataProvider, ProgressSink, Transfer, TransferProvider,
};
use downtube_download::{DownloadOrchestrator, OrchestratorDeps};

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

/// An 11-character resource id distinct per `n`.
pub fn item_id(n: usize) -> String {
    format!("item{n:07}")
}

// ============================================================================
// Metadata
// ============================================================================

#[derive(Default)]
pub struct FakeMetadata {
    resources: HashMap<String, ResourceInfo>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, id: &str, title: &str, encodings: Vec<Encoding>) -> Self {
        let info = ResourceInfo {
            id: ResourceId::parse(id).expect("valid test id"),
            title: title.to_string(),
            encodings,
        };
        self.resources.insert(id.to_string(), info);
        self
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn fetch_resource(&self, id: &ResourceId) -> DownloadResult<ResourceInfo> {
        self.calls.lock().unwrap().push(id.as_str().to_string());
        self.resources
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| DownloadError::metadata(format!("Video unavailable: {id}")))
    }

    async fn fetch_playlist(
        &self,
        id: &PlaylistId,
        _limit: usize,
    ) -> DownloadResult<PlaylistManifest> {
        Err(DownloadError::metadata(format!("no playlist {id}")))
    }
}

// ============================================================================
// Transfer
// ============================================================================

#[derive(Clone)]
pub enum Script {
    /// Deliver these chunks, then end.
    Chunks(Vec<&'static [u8]>),
    /// Deliver these chunks, then fail.
    FailAfter(Vec<&'static [u8]>, &'static str),
    /// Refuse to open.
    FailOpen(&'static str),
    /// Deliver these chunks, then never finish.
    Stall(Vec<&'static [u8]>),
}

#[derive(Default)]
pub struct FakeTransfer {
    scripts: HashMap<String, Script>,
    pub opened: Mutex<Vec<(String, StreamKind)>>,
}

impl FakeTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, selector: &str, script: Script) -> Self {
        self.scripts.insert(selector.to_string(), script);
        self
    }

    pub fn opened_selectors(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .map(|(s, _)| s.clone())
            .collect()
    }
}

fn yielding(
    chunks: Vec<&'static [u8]>,
) -> impl futures_util::Stream<Item = DownloadResult<Bytes>> + Send + 'static {
    stream::iter(chunks).then(|c| async move {
        tokio::task::yield_now().await;
        Ok(Bytes::from_static(c))
    })
}

#[async_trait]
impl TransferProvider for FakeTransfer {
    async fn open(
        &self,
        _id: &ResourceId,
        selector: &SelectorToken,
        kind: StreamKind,
    ) -> DownloadResult<Transfer> {
        self.opened
            .lock()
            .unwrap()
            .push((selector.as_str().to_string(), kind));

        let script = self
            .scripts
            .get(selector.as_str())
            .cloned()
            .unwrap_or_else(|| Script::Chunks(vec!["data".as_bytes()]));

        let chunks = match script {
            Script::Chunks(c) => yielding(c).boxed(),
            Script::FailAfter(c, msg) => yielding(c)
                .chain(stream::once(async move { Err(DownloadError::transfer(msg)) }))
                .boxed(),
            Script::FailOpen(msg) => return Err(DownloadError::transfer(msg)),
            Script::Stall(c) => yielding(c).chain(stream::pending()).boxed(),
        };
        Ok(Transfer::new(None, chunks))
    }
}

// ============================================================================
// Encoder
// ============================================================================

pub struct FakeEncoder {
    available: bool,
    fail_with: Option<&'static str>,
    pub requests: Mutex<Vec<EncodeRequest>>,
    /// Files present in the output directory when `encode` was called.
    pub seen_at_encode: Mutex<Vec<String>>,
}

impl FakeEncoder {
    pub fn working() -> Self {
        Self {
            available: true,
            fail_with: None,
            requests: Mutex::new(Vec::new()),
            seen_at_encode: Mutex::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        Self {
            available: false,
            ..Self::working()
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            fail_with: Some(message),
            ..Self::working()
        }
    }
}

#[async_trait]
impl EncoderPort for FakeEncoder {
    async fn probe(&self) -> DownloadResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(DownloadError::encoder_unavailable(
                "failed to spawn ffmpeg: No such file or directory",
            ))
        }
    }

    async fn encode(&self, request: &EncodeRequest) -> DownloadResult<()> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(dir) = request.output().parent() {
            *self.seen_at_encode.lock().unwrap() = file_names(dir);
        }
        if let Some(msg) = self.fail_with {
            return Err(DownloadError::merge_failed(msg));
        }

        let mut out = Vec::new();
        match request {
            EncodeRequest::TranscodeAudio { input, .. } => {
                out.extend(std::fs::read(input).unwrap());
            }
            EncodeRequest::Merge { video, audio, .. } => {
                out.extend(std::fs::read(video).unwrap());
                out.extend(std::fs::read(audio).unwrap());
            }
        }
        std::fs::write(request.output(), out).unwrap();
        Ok(())
    }
}

// ============================================================================
// Progress
// ============================================================================

#[derive(Default)]
pub struct RecordingSink {
    pub begins: Mutex<Vec<u64>>,
    pub totals: Mutex<Vec<u64>>,
    pub finishes: AtomicUsize,
}

impl RecordingSink {
    pub fn totals(&self) -> Vec<u64> {
        self.totals.lock().unwrap().clone()
    }

    pub fn finish_count(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }
}

impl ProgressSink for RecordingSink {
    fn begin(&self, total: u64) {
        self.begins.lock().unwrap().push(total);
    }

    fn advance(&self, snapshot: &ProgressSnapshot) {
        self.totals.lock().unwrap().push(snapshot.downloaded);
    }

    fn finish(&self) {
        self.finishes.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub metadata: Arc<FakeMetadata>,
    pub transfer: Arc<FakeTransfer>,
    pub encoder: Arc<FakeEncoder>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(metadata: FakeMetadata, transfer: FakeTransfer, encoder: FakeEncoder) -> Self {
        Self {
            metadata: Arc::new(metadata),
            transfer: Arc::new(transfer),
            encoder: Arc::new(encoder),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    /// Orchestrator with throttling disabled so every update is observable.
    pub fn orchestrator(&self) -> DownloadOrchestrator {
        DownloadOrchestrator::new(OrchestratorDeps {
            metadata: Arc::clone(&self.metadata) as Arc<dyn MetadataProvider>,
            transfer: Arc::clone(&self.transfer) as Arc<dyn TransferProvider>,
            encoder: Arc::clone(&self.encoder) as Arc<dyn EncoderPort>,
            progress: Arc::clone(&self.sink) as Arc<dyn ProgressSink>,
        })
        .with_throttle_interval(Duration::ZERO)
    }
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

pub fn temp_artifacts_in(dir: &Path) -> Vec<String> {
    file_names(dir)
        .into_iter()
        .filter(|n| n.starts_with(".__tmp_"))
        .collect()
}

pub fn output(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
