//! Download engine for downtube.
//!
//! Everything between "here is a resource id" and "here is your file":
//! format resolution, concurrent stream fetching with progress
//! aggregation, encoder invocation, temporary artifact cleanup, and
//! playlist runs. External tools are reached only through the ports in
//! `downtube_core::ports`.
//!
//! # Modules
//!
//! - `format_resolver` - Picks audio/video encodings from a catalog
//! - `progress` - Per-job aggregation and throttling
//! - `fetcher` - One encoding into one local file
//! - `orchestrator` - Single-resource jobs
//! - `collection` - Playlist ranges and selections

#![deny(unused_crate_dependencies)]

// Re-export core types for convenience
pub use downtube_core::download::{
    DownloadError, DownloadJob, DownloadRequest, DownloadResult, Encoding, MediaType,
    PlaylistManifest, SelectionResult, StreamKind,
};
pub use downtube_core::ports::{EncoderPort, MetadataProvider, ProgressSink, TransferProvider};

pub mod format_resolver;
pub use format_resolver::{
    fallback_muxed_audio, parse_resolution, select_audio, select_formats, select_video,
};

pub(crate) mod progress;
pub use progress::{DEFAULT_THROTTLE_INTERVAL, ProgressAggregator, ProgressThrottle};

mod fetcher;
pub use fetcher::{FetchProgress, StreamFetcher, TransferState};

mod orchestrator;
pub use orchestrator::{DownloadOrchestrator, OrchestratorDeps, TempArtifacts};

mod collection;
pub use collection::{
    CollectionOrchestrator, CollectionReport, CollectionTarget, ItemOutcome, ItemStatus,
};

// Silence unused dev-dependency warnings for crates only the integration tests use
#[cfg(test)]
use tokio_test as _;
