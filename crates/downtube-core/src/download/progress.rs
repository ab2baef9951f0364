//! Progress snapshot passed from the aggregator to a [`ProgressSink`](crate::ports::ProgressSink).

use serde::{Deserialize, Serialize};

/// Point-in-time view of a job's transfer progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProgressSnapshot {
    /// Bytes received across all transfers of the job.
    pub downloaded: u64,
    /// Expected total; 0 when unknown.
    pub total: u64,
    /// Average rate since start, bytes per second.
    pub rate_bps: f64,
}

impl ProgressSnapshot {
    /// Completion percentage, capped at 100. Zero when the total is unknown.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.downloaded as f64 / self.total as f64 * 100.0).min(100.0)
    }

    /// Estimated seconds remaining, when both rate and total are known.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn eta_secs(&self) -> Option<f64> {
        if self.total == 0 || self.rate_bps <= 0.0 || self.downloaded >= self.total {
            return None;
        }
        Some((self.total - self.downloaded) as f64 / self.rate_bps)
    }
}
