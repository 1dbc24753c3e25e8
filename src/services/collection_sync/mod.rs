pub mod events;
pub mod playlist_fetcher;
pub mod reconciler;
pub mod summary;
pub mod title_matcher;

use color_eyre::eyre::{Result, eyre};

use crate::ports::media_server::MediaServer;
use crate::ports::platform::PlatformExtractor;
use events::EventSink;
use playlist_fetcher::PlaylistFetcher;
use reconciler::{CollectionReconciler, PlaylistError, PlaylistOutcome};
use summary::RunStats;

/// Everything one sync run needs to know, passed explicitly to [`run_sync`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Channel id, `@handle` or channel URL.
    pub channel: String,
    /// Member titles the platform uses for entries that cannot be viewed.
    pub unavailable_titles: Vec<String>,
    /// Decide and report, but do not touch any collection.
    pub dry_run: bool,
    /// Stop at the first playlist that cannot be synced.
    pub fail_fast: bool,
}

/// Mirrors every playlist of a channel onto collections of the media server.
///
/// Fails if the channel's playlist index cannot be fetched or the library cannot be
/// searched. Other problems are confined to the affected playlist unless
/// `fail_fast` is set.
#[tracing::instrument(skip_all, fields(channel = %options.channel, dry_run = options.dry_run))]
pub async fn run_sync<E, M>(
    options: &SyncOptions,
    extractor: &E,
    server: &M,
    sink: &dyn EventSink,
) -> Result<RunStats>
where
    E: PlatformExtractor,
    M: MediaServer,
{
    let fetcher = PlaylistFetcher::new(extractor, &options.unavailable_titles);
    let mut reconciler = CollectionReconciler::new(server, sink, options.dry_run);

    if options.fail_fast {
        for playlist in fetcher.fetch_playlists(&options.channel).await? {
            if let PlaylistOutcome::Failed(error) = reconciler.reconcile(&playlist).await? {
                return Err(eyre!("Playlist '{}' failed: {}", playlist.title, error));
            }
        }
        return Ok(reconciler.stats());
    }

    let index = fetcher.fetch_index(&options.channel).await?;
    tracing::debug!("Found {} playlists", index.len());

    for playlist_ref in &index {
        match fetcher.fetch_members(playlist_ref).await {
            Ok(playlist) => {
                reconciler.reconcile(&playlist).await?;
            }
            Err(e) => {
                reconciler.record_failure(playlist_ref.label(), PlaylistError::Fetch(e));
            }
        }
    }

    Ok(reconciler.stats())
}
