use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use tokio::process::Command;

use super::types::YtDlpPlaylist;
use crate::ports::platform::{FlatListing, PlatformExtractor};

const DEFAULT_BINARY: &str = "yt-dlp";

/// Flat, download-free extraction through the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: PathBuf,
}

impl YtDlpExtractor {
    /// Locates `yt-dlp`, either at `binary` or on `PATH`.
    pub fn new(binary: Option<&Path>) -> Result<Self> {
        let requested = binary.unwrap_or_else(|| Path::new(DEFAULT_BINARY));
        let binary = which::which(requested).map_err(|_| {
            eyre!(
                "{} not found. Please install yt-dlp and ensure it's available in PATH.",
                requested.display()
            )
        })?;
        tracing::debug!("Using yt-dlp at {}", binary.display());
        Ok(Self { binary })
    }

    fn args(url: &str) -> [&str; 5] {
        [
            "--flat-playlist",
            "--dump-single-json",
            "--skip-download",
            "--no-warnings",
            url,
        ]
    }
}

#[async_trait::async_trait]
impl PlatformExtractor for YtDlpExtractor {
    #[tracing::instrument(skip(self))]
    async fn extract_flat(&self, url: &str) -> Result<FlatListing> {
        let output = Command::new(&self.binary)
            .args(Self::args(url))
            .kill_on_drop(true)
            .output()
            .await
            .wrap_err("Failed to execute yt-dlp")?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            forward_stderr_line(line);
        }

        if !output.status.success() {
            bail!(
                "yt-dlp exited with {} for '{}': {}",
                output.status,
                url,
                stderr.trim()
            );
        }

        parse_listing(&output.stdout)
    }
}

pub fn parse_listing(stdout: &[u8]) -> Result<FlatListing> {
    let playlist: YtDlpPlaylist =
        serde_json::from_slice(stdout).wrap_err("Failed to parse yt-dlp output")?;
    Ok(playlist.into())
}

fn forward_stderr_line(line: &str) {
    if let Some(message) = line.strip_prefix("[debug] ") {
        tracing::debug!(target: "yt_dlp", "{}", message);
    } else if line.starts_with("ERROR:") {
        tracing::error!(target: "yt_dlp", "{}", line);
    } else if !line.is_empty() {
        tracing::trace!(target: "yt_dlp", "{}", line);
    }
}
