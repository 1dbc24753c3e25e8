use serde::Deserialize;

use crate::ports::platform::{FlatEntry, FlatListing};

/// Top level object printed by `yt-dlp --flat-playlist --dump-single-json`
/// for a playlist or a channel tab.
#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpPlaylist {
    #[serde(default)]
    pub title: Option<String>,
    /// `null` for some channel tabs without playlists
    #[serde(default)]
    pub entries: Option<Vec<YtDlpEntry>>,
}

/// A flat entry. Unavailable videos keep their row but carry a placeholder title
/// such as `[Private video]`.
#[derive(Debug, Clone, Deserialize)]
pub struct YtDlpEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<YtDlpPlaylist> for FlatListing {
    fn from(playlist: YtDlpPlaylist) -> Self {
        FlatListing {
            title: playlist.title,
            entries: playlist
                .entries
                .unwrap_or_default()
                .into_iter()
                .map(|e| FlatEntry {
                    id: e.id,
                    title: e.title,
                    url: e.url,
                })
                .collect(),
        }
    }
}
