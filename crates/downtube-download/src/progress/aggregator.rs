//! Per-job progress aggregation.
//!
//! One aggregator belongs to one job run. Fetchers never talk to it
//! directly: the orchestrator sums their counters and forwards the total.
//!
//! # Guarantees
//!
//! - `update` before `start` or after `stop` is ignored
//! - A total lower than the last one seen is ignored, so rendered progress
//!   never moves backwards
//! - `stop` is idempotent and always flushes the last value to the sink

use std::sync::Arc;
use std::time::Instant;

use downtube_core::ProgressSnapshot;
use downtube_core::ports::ProgressSink;
use tracing::debug;

use super::throttle::ProgressThrottle;

#[derive(Debug, Clone, Copy)]
struct ActiveRun {
    started: Instant,
    total: u64,
    downloaded: u64,
}

impl ActiveRun {
    #[allow(clippy::cast_precision_loss)]
    fn snapshot(&self, now: Instant) -> ProgressSnapshot {
        let secs = now.saturating_duration_since(self.started).as_secs_f64();
        let rate_bps = if secs > 0.0 {
            self.downloaded as f64 / secs
        } else {
            0.0
        };
        ProgressSnapshot {
            downloaded: self.downloaded,
            total: self.total,
            rate_bps,
        }
    }
}

/// Tracks cumulative bytes for one job and renders them through a sink.
pub struct ProgressAggregator {
    sink: Arc<dyn ProgressSink>,
    throttle: ProgressThrottle,
    run: Option<ActiveRun>,
}

impl ProgressAggregator {
    /// Create an aggregator with the default 100ms throttle.
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self::with_throttle(sink, ProgressThrottle::default())
    }

    pub fn with_throttle(sink: Arc<dyn ProgressSink>, throttle: ProgressThrottle) -> Self {
        Self {
            sink,
            throttle,
            run: None,
        }
    }

    /// Begin a run. `expected_total` is 0 when no size is known.
    pub fn start(&mut self, expected_total: u64) {
        self.throttle.reset();
        self.run = Some(ActiveRun {
            started: Instant::now(),
            total: expected_total,
            downloaded: 0,
        });
        self.sink.begin(expected_total);
    }

    /// Record the cumulative byte count across all transfers of the job.
    pub fn update(&mut self, cumulative: u64) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if cumulative < run.downloaded {
            return;
        }
        run.downloaded = cumulative;

        let now = Instant::now();
        if self.throttle.should_emit_at(now) {
            let snapshot = run.snapshot(now);
            self.sink.advance(&snapshot);
        }
    }

    /// End the run: flush the final value and close the sink. Safe to call
    /// repeatedly and without a prior `start`.
    pub fn stop(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let snapshot = run.snapshot(Instant::now());
        self.sink.advance(&snapshot);
        self.sink.finish();
        debug!(
            downloaded = snapshot.downloaded,
            total = snapshot.total,
            suppressed = self.throttle.suppressed(),
            "Progress stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    enum Call {
        Begin(u64),
        Advance(u64),
        Finish,
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<Call>>,
    }

    impl ProgressSink for RecordingSink {
        fn begin(&self, total: u64) {
            self.calls.lock().unwrap().push(Call::Begin(total));
        }

        fn advance(&self, snapshot: &ProgressSnapshot) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Advance(snapshot.downloaded));
        }

        fn finish(&self) {
            self.calls.lock().unwrap().push(Call::Finish);
        }
    }

    fn unthrottled(sink: Arc<RecordingSink>) -> ProgressAggregator {
        ProgressAggregator::with_throttle(sink, ProgressThrottle::new(Duration::ZERO))
    }

    #[test]
    fn test_update_before_start_is_ignored() {
        let sink = Arc::new(RecordingSink::default());
        let mut agg = unthrottled(Arc::clone(&sink));
        agg.update(10);
        assert!(sink.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_regressions_are_ignored() {
        let sink = Arc::new(RecordingSink::default());
        let mut agg = unthrottled(Arc::clone(&sink));
        agg.start(100);
        agg.update(40);
        agg.update(30);
        agg.update(60);
        agg.stop();

        assert_eq!(
            *sink.calls.lock().unwrap(),
            vec![
                Call::Begin(100),
                Call::Advance(40),
                Call::Advance(60),
                Call::Advance(60),
                Call::Finish
            ]
        );
    }

    #[test]
    fn test_stop_is_idempotent_and_safe_without_start() {
        let sink = Arc::new(RecordingSink::default());
        let mut agg = unthrottled(Arc::clone(&sink));
        agg.stop();
        agg.start(0);
        agg.stop();
        agg.stop();
        agg.update(5);

        let finishes = sink
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == Call::Finish)
            .count();
        assert_eq!(finishes, 1);
    }

    #[test]
    fn test_throttle_limits_advances_but_stop_flushes() {
        let sink = Arc::new(RecordingSink::default());
        let mut agg = ProgressAggregator::with_throttle(
            Arc::clone(&sink) as Arc<dyn ProgressSink>,
            ProgressThrottle::new(Duration::from_secs(3600)),
        );
        agg.start(1_000);
        for n in 1..=10 {
            agg.update(n * 100);
        }
        agg.stop();

        assert_eq!(
            *sink.calls.lock().unwrap(),
            vec![
                Call::Begin(1_000),
                Call::Advance(100),
                Call::Advance(1_000),
                Call::Finish
            ]
        );
    }

    #[test]
    fn test_snapshot_average_rate_and_capped_percent() {
        let now = Instant::now();
        let run = ActiveRun {
            started: now.checked_sub(Duration::from_secs(2)).unwrap(),
            total: 100,
            downloaded: 250,
        };
        let snap = run.snapshot(now);
        assert_eq!(snap.downloaded, 250);
        assert!((snap.rate_bps - 125.0).abs() < f64::EPSILON);
        assert!((snap.percent() - 100.0).abs() < f64::EPSILON);

        let fresh = ActiveRun { started: now, ..run };
        assert!(fresh.snapshot(now).rate_bps.abs() < f64::EPSILON);
    }
}
