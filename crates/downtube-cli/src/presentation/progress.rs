//! Terminal progress rendering.
//!
//! [`TerminalProgress`] implements the core `ProgressSink`. On a terminal it
//! draws an `indicatif` bar on stdout; otherwise it prints a plain line
//! every ten percent so redirected output stays readable. Rate, percentage
//! and time left come from the job's progress snapshots.

use std::io::IsTerminal;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use downtube_core::{ProgressSink, ProgressSnapshot};

use super::tables::human_bytes;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({msg})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes} ({msg})";
const WAITING: &str = "waiting";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Bar,
    Plain,
}

enum State {
    Idle,
    Bar(ProgressBar),
    Plain {
        downloaded: u64,
        /// Last reported tenth (0..=10).
        reported: u8,
    },
}

/// Progress sink for the `downtube` binary.
///
/// One instance serves every job of a run; `begin` starts a fresh bar.
pub struct TerminalProgress {
    mode: Mode,
    state: Mutex<State>,
}

impl TerminalProgress {
    /// Bar when stdout is a terminal, plain lines otherwise.
    pub fn new() -> Self {
        if std::io::stdout().is_terminal() {
            Self::with_mode(Mode::Bar)
        } else {
            Self::plain()
        }
    }

    /// Always print plain lines.
    pub fn plain() -> Self {
        Self::with_mode(Mode::Plain)
    }

    const fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            state: Mutex::new(State::Idle),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a download-style progress bar.
    fn create_download_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stdout());
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb.set_message(WAITING);
        pb
    }

    /// Create a spinner for transfers of unknown size.
    fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        let style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(WAITING);
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn begin(&self, total: u64) {
        let next = match self.mode {
            Mode::Bar if total > 0 => State::Bar(Self::create_download_bar(total)),
            Mode::Bar => State::Bar(Self::create_spinner()),
            Mode::Plain => State::Plain {
                downloaded: 0,
                reported: 0,
            },
        };
        let mut state = self.state();
        if let State::Bar(old) = std::mem::replace(&mut *state, next) {
            old.finish_and_clear();
        }
    }

    fn advance(&self, snapshot: &ProgressSnapshot) {
        match &mut *self.state() {
            State::Idle => {}
            State::Bar(pb) => {
                if pb.length().is_some_and(|len| snapshot.total > len) {
                    pb.set_length(snapshot.total);
                }
                pb.set_position(snapshot.downloaded);
                pb.set_message(rate_message(snapshot));
            }
            State::Plain {
                downloaded,
                reported,
            } => {
                *downloaded = snapshot.downloaded;
                if let Some(tenth) = next_tenth(*reported, snapshot.percent()) {
                    *reported = tenth;
                    println!(
                        "  {:>3.0}%  {} / {}  {}",
                        snapshot.percent(),
                        human_bytes(snapshot.downloaded),
                        human_bytes(snapshot.total),
                        rate_message(snapshot)
                    );
                }
            }
        }
    }

    fn finish(&self) {
        match std::mem::replace(&mut *self.state(), State::Idle) {
            State::Idle => {}
            State::Bar(pb) => pb.finish(),
            State::Plain { downloaded, .. } => {
                println!("  received {}", human_bytes(downloaded));
            }
        }
    }
}

/// The tenth to report, if `percent` crossed a new one since `reported`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn next_tenth(reported: u8, percent: f64) -> Option<u8> {
    let tenth = (percent.clamp(0.0, 100.0) / 10.0).floor() as u8;
    (tenth > reported).then_some(tenth)
}

/// Average rate, plus time left when it can be estimated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rate_message(snapshot: &ProgressSnapshot) -> String {
    let rate = format!("{}/s", human_bytes(snapshot.rate_bps.max(0.0) as u64));
    match snapshot.eta_secs() {
        Some(secs) => format!("{rate}, {} left", format_eta(secs.ceil() as u64)),
        None => rate,
    }
}

fn format_eta(secs: u64) -> String {
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m{:02}s", secs / 60, secs % 60),
        _ => format!("{}h{:02}m", secs / 3600, secs % 3600 / 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(downloaded: u64, total: u64) -> ProgressSnapshot {
        ProgressSnapshot {
            downloaded,
            total,
            rate_bps: 0.0,
        }
    }

    #[test]
    fn test_next_tenth() {
        assert_eq!(next_tenth(0, 5.0), None);
        assert_eq!(next_tenth(0, 10.0), Some(1));
        assert_eq!(next_tenth(1, 19.9), None);
        assert_eq!(next_tenth(1, 55.0), Some(5));
        assert_eq!(next_tenth(5, 100.0), Some(10));
        assert_eq!(next_tenth(10, 100.0), None);
        assert_eq!(next_tenth(0, 0.0), None);
    }

    #[test]
    fn test_rate_message_uses_snapshot_rate() {
        let mut s = snapshot(0, 0);
        s.rate_bps = 1536.0;
        assert_eq!(rate_message(&s), "1.5 KiB/s");

        let s = ProgressSnapshot {
            downloaded: 1024,
            total: 1024 + 90 * 2048,
            rate_bps: 2048.0,
        };
        assert_eq!(rate_message(&s), "2.0 KiB/s, 1m30s left");
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(0), "0s");
        assert_eq!(format_eta(59), "59s");
        assert_eq!(format_eta(61), "1m01s");
        assert_eq!(format_eta(7260), "2h01m");
    }

    #[test]
    fn test_plain_mode_reports_snapshot_percent() {
        let progress = TerminalProgress::plain();
        progress.begin(200);
        progress.advance(&snapshot(50, 200));
        progress.advance(&snapshot(120, 240));

        match &*progress.state() {
            State::Plain {
                downloaded,
                reported,
            } => {
                assert_eq!(*downloaded, 120);
                assert_eq!(*reported, 5);
            }
            _ => panic!("expected plain state"),
        }

        progress.finish();
        assert!(matches!(*progress.state(), State::Idle));
    }

    #[test]
    fn test_advance_before_begin_is_ignored() {
        let progress = TerminalProgress::plain();
        progress.advance(&snapshot(10, 10));
        progress.finish();
        assert!(matches!(*progress.state(), State::Idle));
    }

    #[test]
    fn test_bar_mode_reuse_across_jobs() {
        let progress = TerminalProgress::with_mode(Mode::Bar);
        progress.begin(100);
        progress.advance(&snapshot(40, 100));
        progress.begin(0);
        progress.advance(&snapshot(7, 0));
        progress.finish();
        assert!(matches!(*progress.state(), State::Idle));
    }
}
