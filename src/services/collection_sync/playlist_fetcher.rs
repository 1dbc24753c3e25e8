use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::ports::platform::{FlatEntry, PlatformExtractor};
use crate::services::youtube::{playlist_url_for_id, playlists_index_url};

/// A playlist as listed in the channel's playlist index, before its members are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: Option<String>,
    pub url: String,
    pub title: Option<String>,
}

impl PlaylistRef {
    /// Name to report the playlist under: its title, or its URL when it has none.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}

/// One playlist ready for reconciliation. `id` is the platform's playlist id, or the
/// playlist URL when the index did not carry one. Member titles keep the platform's
/// order with unavailable and untitled entries already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDescriptor {
    pub id: String,
    pub title: String,
    pub member_titles: Vec<String>,
}

/// Two level flat extraction: the channel's playlist index, then each playlist's members.
pub struct PlaylistFetcher<'a, E: PlatformExtractor> {
    extractor: &'a E,
    unavailable_titles: &'a [String],
}

impl<'a, E: PlatformExtractor> PlaylistFetcher<'a, E> {
    pub fn new(extractor: &'a E, unavailable_titles: &'a [String]) -> Self {
        Self {
            extractor,
            unavailable_titles,
        }
    }

    /// Playlists of a channel in the order the platform reports them
    /// (most recently updated first).
    #[tracing::instrument(skip(self))]
    pub async fn fetch_index(&self, channel: &str) -> Result<Vec<PlaylistRef>> {
        let index_url = playlists_index_url(channel);
        let listing = self
            .extractor
            .extract_flat(&index_url)
            .await
            .wrap_err_with(|| format!("Failed to list playlists at '{}'", index_url))?;

        listing
            .entries
            .into_iter()
            .map(playlist_ref_from_entry)
            .collect()
    }

    /// Members of one playlist. A playlist the index listed without a title cannot be
    /// named as a collection and fails here.
    pub async fn fetch_members(&self, playlist: &PlaylistRef) -> Result<PlaylistDescriptor> {
        let title = playlist
            .title
            .clone()
            .ok_or_else(|| eyre!("Playlist at '{}' has no title", playlist.url))?;

        let listing = self
            .extractor
            .extract_flat(&playlist.url)
            .await
            .wrap_err_with(|| format!("Failed to list videos of playlist '{}'", title))?;

        let member_titles = listing
            .entries
            .into_iter()
            .filter_map(|entry| entry.title)
            .filter(|title| !self.is_unavailable(title))
            .collect();

        Ok(PlaylistDescriptor {
            id: playlist.id.clone().unwrap_or_else(|| playlist.url.clone()),
            title,
            member_titles,
        })
    }

    /// Index plus every playlist's members. The first extraction error aborts.
    pub async fn fetch_playlists(&self, channel: &str) -> Result<Vec<PlaylistDescriptor>> {
        let index = self.fetch_index(channel).await?;
        let mut descriptors = Vec::with_capacity(index.len());
        for playlist in &index {
            descriptors.push(self.fetch_members(playlist).await?);
        }
        Ok(descriptors)
    }

    fn is_unavailable(&self, title: &str) -> bool {
        self.unavailable_titles.iter().any(|t| t == title)
    }
}

fn playlist_ref_from_entry(entry: FlatEntry) -> Result<PlaylistRef> {
    let url = match (entry.url, &entry.id) {
        (Some(url), _) => url,
        (None, Some(id)) => playlist_url_for_id(id),
        (None, None) => {
            return Err(eyre!(
                "Playlist '{}' in channel index has neither url nor id",
                entry.title.as_deref().unwrap_or_default()
            ));
        }
    };
    Ok(PlaylistRef {
        id: entry.id,
        url,
        title: entry.title,
    })
}
