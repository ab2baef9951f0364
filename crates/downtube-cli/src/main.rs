//! CLI entry point - the composition root.
//!
//! Settings and adapters are wired once through `bootstrap`; dispatch then
//! routes to a handler by URL shape and flags.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use downtube_cli::{Cli, CliError, PlaylistSelection, bootstrap, describe, handlers, load_settings};
use downtube_core::{is_playlist_input, validate_options};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let (code, message) = describe(&err);
        tracing::debug!(error = ?err, code, "Command failed");
        eprintln!("Error: {message}");
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout belongs to progress and results.
fn init_tracing(verbose: bool) {
    let verbose = verbose
        || std::env::var("DOWNTUBE_VERBOSE")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(url) = cli.target().map(str::to_string) else {
        return Err(CliError::Arguments(
            "no URL given (pass it as the first argument or with --url)".to_string(),
        )
        .into());
    };
    let playlist = is_playlist_input(&url);
    let selection = cli.selection();
    if !playlist && selection != PlaylistSelection::All {
        return Err(CliError::Arguments("--range and --items apply to playlist URLs only".to_string()).into());
    }
    if playlist && cli.list_formats {
        return Err(CliError::Arguments("--list-formats takes a single video URL".to_string()).into());
    }

    // Bootstrap the CLI context (composition root)
    let settings = load_settings(&cli)?;
    let ctx = bootstrap(settings);
    let options = validate_options(&cli.media_type, cli.quality.as_deref(), &ctx.output_dir())?;

    if cli.list_formats {
        handlers::formats::execute(&ctx, &url, &options).await
    } else if playlist {
        handlers::playlist::execute(&ctx, &url, &options, &selection).await
    } else {
        handlers::video::execute(&ctx, &url, &options).await
    }
}
