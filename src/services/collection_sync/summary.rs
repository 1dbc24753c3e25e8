use super::events::SyncEvent;

/// Counters for one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Playlists that reached a terminal state (skipped, created, updated or failed).
    pub playlists_processed: usize,
    pub videos_matched: usize,
    pub videos_unmatched: usize,
    pub collections_created: usize,
    pub collections_updated: usize,
    pub collections_skipped: usize,
    pub collections_failed: usize,
}

/// Aggregates [`SyncEvent`]s into [`RunStats`].
#[derive(Debug, Default)]
pub struct RunSummary {
    stats: RunStats,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &SyncEvent) {
        let stats = &mut self.stats;
        match event {
            SyncEvent::PlaylistStarted { .. } => {}
            SyncEvent::VideoMatched { .. } => stats.videos_matched += 1,
            SyncEvent::VideoUnmatched { .. } => stats.videos_unmatched += 1,
            SyncEvent::PlaylistSkipped { .. } => {
                stats.collections_skipped += 1;
                stats.playlists_processed += 1;
            }
            SyncEvent::CollectionCreated { .. } => {
                stats.collections_created += 1;
                stats.playlists_processed += 1;
            }
            SyncEvent::CollectionUpdated { .. } => {
                stats.collections_updated += 1;
                stats.playlists_processed += 1;
            }
            SyncEvent::PlaylistFailed { .. } => {
                stats.collections_failed += 1;
                stats.playlists_processed += 1;
            }
        }
    }

    pub fn report(&self) -> RunStats {
        self.stats
    }
}
