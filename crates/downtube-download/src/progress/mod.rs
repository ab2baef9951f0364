//! Progress tracking and throttling.
//!
//! This module handles progress aggregation and rate-limiting for download
//! progress updates.

mod aggregator;
mod throttle;

pub use aggregator::ProgressAggregator;
pub use throttle::{DEFAULT_THROTTLE_INTERVAL, ProgressThrottle};
