//! Process execution seam.
//!
//! Metadata calls run yt-dlp to completion and read its stdout. The
//! [`JsonBackend`] trait isolates that so the client can be tested with
//! canned output. Streaming transfers spawn the process directly (see
//! `port`).

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{YtDlpError, YtDlpResult};

/// Runs yt-dlp with the given arguments and returns its stdout.
#[async_trait]
pub trait JsonBackend: Send + Sync {
    async fn run(&self, args: &[String]) -> YtDlpResult<Vec<u8>>;
}

/// Production backend running the executable.
pub struct ProcessBackend {
    binary: PathBuf,
}

impl ProcessBackend {
    pub const fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

#[async_trait]
impl JsonBackend for ProcessBackend {
    async fn run(&self, args: &[String]) -> YtDlpResult<Vec<u8>> {
        debug!(binary = %self.binary.display(), ?args, "Running yt-dlp");
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| YtDlpError::spawn(&self.binary, e))?;

        if !output.status.success() {
            return Err(YtDlpError::exit(output.status, &output.stderr));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Canned stdout or failure, recording every argument list it sees.
    pub struct FakeBackend {
        stdout: Result<Vec<u8>, String>,
        pub calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeBackend {
        pub fn returning(stdout: impl Into<Vec<u8>>) -> Self {
            Self {
                stdout: Ok(stdout.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(stderr: &str) -> Self {
            Self {
                stdout: Err(stderr.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl JsonBackend for FakeBackend {
        async fn run(&self, args: &[String]) -> YtDlpResult<Vec<u8>> {
            self.calls.lock().unwrap().push(args.to_vec());
            self.stdout.clone().map_err(|stderr| YtDlpError::Exit {
                status: "exit status: 1".to_string(),
                stderr,
            })
        }
    }
}
