use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNAVAILABLE_TITLES: [&str; 2] = ["[Private video]", "[Deleted video]"];

/// Optional settings file. Every key can also be given on the command line,
/// which takes precedence.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plex_url: Option<String>,
    #[serde(default)]
    pub plex_token: Option<String>,
    #[serde(default)]
    pub plex_library: Option<String>,
    /// Path to the yt-dlp executable, looked up on PATH when unset
    #[serde(default)]
    pub yt_dlp_path: Option<String>,
    #[serde(default)]
    pub unavailable_titles: Option<Vec<String>>,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err(format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .wrap_err(format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("yt-plex-collections").join("config.toml"))
    }

    /// Load the default config file, falling back to defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Expand ~ to home directory
    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    pub fn yt_dlp_path(&self) -> Option<PathBuf> {
        self.yt_dlp_path.as_deref().map(Self::expand_path)
    }

    pub fn unavailable_titles(&self) -> Vec<String> {
        match &self.unavailable_titles {
            Some(titles) => titles.clone(),
            None => DEFAULT_UNAVAILABLE_TITLES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}
