//! Locating the ffmpeg executable.
//!
//! Order: explicit path, `DOWNTUBE_FFMPEG`, an `ffmpeg` next to the running
//! executable, `ffmpeg` on `PATH`, and finally the bare name (which then
//! fails at probe time with a clear message).

use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable naming the ffmpeg executable.
pub const FFMPEG_ENV: &str = "DOWNTUBE_FFMPEG";

/// Where the ffmpeg path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySource {
    Explicit,
    Environment,
    Bundled,
    SearchPath,
    Fallback,
}

/// A resolved ffmpeg path and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    pub path: PathBuf,
    pub source: BinarySource,
}

/// Resolve ffmpeg against the real process environment.
pub fn resolve_ffmpeg(explicit: Option<&Path>) -> ResolvedBinary {
    let env = std::env::var_os(FFMPEG_ENV).map(PathBuf::from);
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let resolved = resolve_with(explicit, env.as_deref(), exe_dir.as_deref(), || {
        which::which(executable_name()).ok()
    });
    debug!(path = %resolved.path.display(), source = ?resolved.source, "Resolved ffmpeg");
    resolved
}

fn resolve_with(
    explicit: Option<&Path>,
    env: Option<&Path>,
    exe_dir: Option<&Path>,
    search_path: impl FnOnce() -> Option<PathBuf>,
) -> ResolvedBinary {
    let found = |path: PathBuf, source| ResolvedBinary { path, source };

    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return found(path.to_path_buf(), BinarySource::Explicit);
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return found(path.to_path_buf(), BinarySource::Environment);
    }
    if let Some(bundled) = exe_dir
        .map(|dir| dir.join(executable_name()))
        .filter(|p| p.is_file())
    {
        return found(bundled, BinarySource::Bundled);
    }
    if let Some(path) = search_path() {
        return found(path, BinarySource::SearchPath);
    }
    found(PathBuf::from(executable_name()), BinarySource::Fallback)
}

const fn executable_name() -> &'static str {
    if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }
}
