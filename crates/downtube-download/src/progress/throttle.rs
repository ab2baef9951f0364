//! Progress throttling.
//!
//! Rate-limits sink updates so a fast transfer does not redraw the terminal
//! on every chunk.

use std::time::{Duration, Instant};

/// Default minimum gap between two rendered updates.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(100);

/// Rate-limiter for progress updates.
///
/// Ensures updates are not forwarded more frequently than the configured
/// interval, and counts the ones it swallowed.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
    suppressed: u64,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
            suppressed: 0,
        }
    }

    /// Create a throttle with the default interval of 100ms.
    pub const fn default_interval() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }

    /// Check if enough time has passed to emit another progress update.
    pub fn should_emit(&mut self) -> bool {
        self.should_emit_at(Instant::now())
    }

    /// Same as [`should_emit`](Self::should_emit) with an explicit clock reading.
    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => {
                self.suppressed += 1;
                false
            }
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Number of updates swallowed since the last reset.
    pub const fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Force the next check to return true and clear the suppressed count.
    pub const fn reset(&mut self) {
        self.last_emit = None;
        self.suppressed = 0;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}
