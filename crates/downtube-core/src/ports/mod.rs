//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process/filesystem implementation details in signatures
//! - All async ports are `Send + Sync` and object safe (`Arc<dyn ...>`)
//! - Errors are expressed as `DownloadError`

pub mod encoder;
pub mod metadata;
pub mod progress_sink;
pub mod transfer;

pub use encoder::{EncodeRequest, EncoderPort};
pub use metadata::MetadataProvider;
pub use progress_sink::{NoopProgressSink, ProgressSink};
pub use transfer::{ChunkStream, Transfer, TransferProvider};
