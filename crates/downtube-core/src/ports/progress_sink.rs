//! Progress rendering port.

use crate::download::ProgressSnapshot;

/// Receives rendered progress from the aggregator.
///
/// Implementations must not block; they are called from inside the
/// transfer loop.
///
/// # Implementations
///
/// - `NoopProgressSink` - For tests and quiet contexts
/// - Terminal renderers in the CLI crate
pub trait ProgressSink: Send + Sync {
    /// A job's transfers are starting. `total` is 0 when unknown.
    fn begin(&self, total: u64);

    /// New cumulative progress.
    fn advance(&self, snapshot: &ProgressSnapshot);

    /// Transfers are over (success or not).
    fn finish(&self);
}

/// A sink that discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn begin(&self, _total: u64) {}

    fn advance(&self, _snapshot: &ProgressSnapshot) {}

    fn finish(&self) {}
}
