//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings from `.env`, environment variables, and flags
//! - The yt-dlp client (metadata and transfers)
//! - The ffmpeg encoder (via downtube-runtime)
//! - The terminal progress sink
//!
//! Handlers receive the composed [`CliContext`] and never build adapters
//! themselves.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use downtube_core::{MetadataProvider, Settings, SettingsUpdate, validate_settings};
use downtube_download::{DownloadOrchestrator, OrchestratorDeps};
use downtube_runtime::{FfmpegEncoder, resolve_ffmpeg};
use downtube_ytdlp::{DefaultYtDlpClient, YtDlpConfig};

use crate::error::CliError;
use crate::parser::Cli;
use crate::presentation::TerminalProgress;

/// Environment variable for the default output directory.
pub const OUTPUT_ENV: &str = "DOWNTUBE_OUTPUT";
/// Environment variable naming the yt-dlp executable.
pub const YTDLP_ENV: &str = "DOWNTUBE_YTDLP";
/// Environment variable naming an `arnndn` model file.
pub const DENOISE_MODEL_ENV: &str = "DOWNTUBE_DENOISE_MODEL";
/// Environment variable for the playlist fetch limit.
pub const PLAYLIST_LIMIT_ENV: &str = "DOWNTUBE_PLAYLIST_LIMIT";

/// Fully composed context for command handlers.
pub struct CliContext {
    /// Single-resource download engine.
    pub downloader: DownloadOrchestrator,
    /// Metadata provider, for format listings and playlist manifests.
    pub metadata: Arc<dyn MetadataProvider>,
    /// Effective settings after env and flag layering.
    pub settings: Settings,
}

impl CliContext {
    pub fn downloader(&self) -> &DownloadOrchestrator {
        &self.downloader
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataProvider> {
        &self.metadata
    }

    /// Directory downloads land in.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.settings.effective_output_dir())
    }
}

/// Build settings from the process environment and the parsed flags.
///
/// `DOWNTUBE_FFMPEG` is read by the encoder binary lookup, not here.
pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    settings_from(cli, |key| std::env::var(key).ok())
}

/// Layer defaults, then environment, then flags.
fn settings_from(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Settings, CliError> {
    let mut settings = Settings::with_defaults();
    settings.merge(&env_update(&env)?);
    settings.merge(&flag_update(cli));
    validate_settings(&settings)?;
    debug!(?settings, "Loaded settings");
    Ok(settings)
}

fn env_update(env: &impl Fn(&str) -> Option<String>) -> Result<SettingsUpdate, CliError> {
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let playlist_limit = match var(PLAYLIST_LIMIT_ENV) {
        Some(raw) => Some(Some(raw.trim().parse::<u32>().map_err(|_| {
            CliError::Config(format!("{PLAYLIST_LIMIT_ENV} must be a number, got '{raw}'"))
        })?)),
        None => None,
    };

    Ok(SettingsUpdate {
        output_dir: var(OUTPUT_ENV).map(Some),
        ffmpeg_path: None,
        ytdlp_path: var(YTDLP_ENV).map(Some),
        denoise_model: var(DENOISE_MODEL_ENV).map(Some),
        playlist_limit,
    })
}

fn flag_update(cli: &Cli) -> SettingsUpdate {
    let path = |p: &Option<PathBuf>| p.as_ref().map(|p| Some(p.to_string_lossy().into_owned()));
    SettingsUpdate {
        output_dir: path(&cli.output),
        ffmpeg_path: path(&cli.ffmpeg),
        ytdlp_path: path(&cli.ytdlp),
        denoise_model: path(&cli.denoise_model),
        playlist_limit: cli.limit.map(Some),
    }
}

/// Bootstrap the CLI application.
///
/// Wires the yt-dlp client as both metadata and transfer provider, the
/// ffmpeg encoder, and terminal progress into one orchestrator.
pub fn bootstrap(settings: Settings) -> CliContext {
    let ytdlp = Arc::new(DefaultYtDlpClient::new(
        YtDlpConfig::new().with_optional_binary(settings.ytdlp_path.as_ref().map(PathBuf::from)),
    ));

    let ffmpeg = resolve_ffmpeg(settings.ffmpeg_path.as_deref().map(std::path::Path::new));
    let encoder = FfmpegEncoder::from_resolved(ffmpeg)
        .with_denoise_model(settings.denoise_model.as_ref().map(PathBuf::from));

    let downloader = DownloadOrchestrator::new(OrchestratorDeps {
        metadata: ytdlp.clone(),
        transfer: ytdlp.clone(),
        encoder: Arc::new(encoder),
        progress: Arc::new(TerminalProgress::new()),
    });

    CliContext {
        downloader,
        metadata: ytdlp,
        settings,
    }
}
