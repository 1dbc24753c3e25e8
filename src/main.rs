mod config;
mod logging;
mod plex_rs;
mod ports;
mod services;
#[cfg(test)]
mod test_utils;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{OptionExt, WrapErr},
};
use url::Url;

use crate::{
    config::Config,
    logging::init_tracing,
    services::{
        collection_sync::{SyncOptions, events::TracingEventSink, run_sync},
        plex::PlexHttpAdapter,
        youtube::{YtDlpExtractor, channel_url},
    },
};

/// Mirror a YouTube channel's playlists as Plex collections.
///
/// Videos are not downloaded; they are expected to already be in the Plex library
/// under the same titles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the Plex instance (e.g. http://localhost:32400)
    #[arg(long, env = "PLEX_URL")]
    plex_url: Option<Url>,

    /// Token to use to talk to the Plex API
    /// (see https://support.plex.tv/articles/204059436-finding-an-authentication-token-x-plex-token/)
    #[arg(long, env = "PLEX_TOKEN", hide_env_values = true)]
    plex_token: Option<String>,

    /// Library/Section to scan for videos and create collections in
    #[arg(long, env = "PLEX_LIBRARY")]
    plex_library: Option<String>,

    /// ID of the YouTube channel to create collections for (an @handle or channel URL also works)
    #[arg(long, env = "YOUTUBE_CHANNEL_ID")]
    youtube_channel_id: String,

    /// Assume no human is present and do not confirm that the settings are correct
    #[arg(short, long)]
    unattended: bool,

    /// Report what would change without touching any collection
    #[arg(long)]
    dry_run: bool,

    /// Abort the whole run at the first playlist that cannot be synced
    #[arg(long)]
    fail_fast: bool,

    /// The config file to use
    #[arg(short, long, env = "YT_PLEX_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `yt_plex_collections=debug`
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, env = "OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,
}

/// Settings after merging the command line over the config file.
struct Settings {
    plex_url: Url,
    plex_token: String,
    plex_library: String,
    yt_dlp_path: Option<PathBuf>,
    options: SyncOptions,
}

impl Settings {
    fn resolve(args: &Args, config: Config) -> Result<Self> {
        let plex_url = match &args.plex_url {
            Some(url) => url.clone(),
            None => {
                let url = config
                    .plex_url
                    .as_deref()
                    .ok_or_eyre("Missing Plex URL. Pass --plex-url or set plex_url in the config file")?;
                Url::parse(url).wrap_err_with(|| format!("Invalid Plex URL: {}", url))?
            }
        };
        let plex_token = args
            .plex_token
            .clone()
            .or_else(|| config.plex_token.clone())
            .ok_or_eyre("Missing Plex token. Pass --plex-token or set plex_token in the config file")?;
        let plex_library = args
            .plex_library
            .clone()
            .or_else(|| config.plex_library.clone())
            .ok_or_eyre(
                "Missing Plex library. Pass --plex-library or set plex_library in the config file",
            )?;

        Ok(Self {
            plex_url,
            plex_token,
            plex_library,
            yt_dlp_path: config.yt_dlp_path(),
            options: SyncOptions {
                channel: args.youtube_channel_id.clone(),
                unavailable_titles: config.unavailable_titles(),
                dry_run: args.dry_run,
                fail_fast: args.fail_fast,
            },
        })
    }
}

/// Confirms with the user that the configuration is correct
fn confirm_settings(
    settings: &Settings,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<bool> {
    writeln!(output, "This application will sync playlists from YouTube to Plex!")?;
    writeln!(output, "Please confirm the below information is correct:")?;
    writeln!(output)?;
    writeln!(output, "    Plex URL: {}", settings.plex_url)?;
    writeln!(output, "    Plex Library: {}", settings.plex_library)?;
    writeln!(
        output,
        "    YouTube Channel: {}",
        channel_url(&settings.options.channel)
    )?;
    writeln!(output)?;
    write!(output, "Is this correct? [y/N]: ")?;
    output.flush()?;

    let mut answer = String::new();
    // EOF (e.g. Ctrl-D) reads zero bytes and counts as a no
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

async fn run(settings: Settings) -> Result<()> {
    let extractor = YtDlpExtractor::new(settings.yt_dlp_path.as_deref())?;
    let plex = PlexHttpAdapter::connect(
        settings.plex_url,
        settings.plex_token,
        &settings.plex_library,
    )
    .await
    .wrap_err("Failed to connect to Plex")?;

    let stats = run_sync(&settings.options, &extractor, &plex, &TracingEventSink).await?;

    tracing::info!("Processed {} playlists", stats.playlists_processed);
    tracing::info!(
        matched = stats.videos_matched,
        unmatched = stats.videos_unmatched,
        created = stats.collections_created,
        updated = stats.collections_updated,
        skipped = stats.collections_skipped,
        failed = stats.collections_failed,
        "Sync summary"
    );
    Ok(())
}

/// Everything after logging is set up. Declining the confirmation exits with failure.
async fn app(
    args: &Args,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .wrap_err("Failed to load config")?;
    let settings = Settings::resolve(args, config)?;

    if !args.unattended && !confirm_settings(&settings, input, output)? {
        return Ok(ExitCode::FAILURE);
    }

    run(settings).await?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        env!("CARGO_PKG_NAME"),
        args.otlp_endpoint.as_deref(),
        &args.log_level,
    )?;

    let result = app(&args, &mut io::stdin().lock(), &mut io::stdout()).await;

    if let Some(provider) = tracer_provider
        && let Err(e) = provider.shutdown()
    {
        eprintln!("Failed to shut down tracer provider: {}", e);
    }

    result
}
