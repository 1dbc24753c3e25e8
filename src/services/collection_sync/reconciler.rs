use color_eyre::eyre::{Result, WrapErr};

use super::events::{EventSink, SyncEvent};
use super::playlist_fetcher::PlaylistDescriptor;
use super::summary::{RunStats, RunSummary};
use super::title_matcher::{TitleMatch, TitleMatcher};
use crate::ports::media_server::{CatalogEntry, MediaServer, SearchKind};

/// Desired end state of the collection mirroring one playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTarget {
    pub title: String,
    pub members: Vec<CatalogEntry>,
}

impl CollectionTarget {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            members: Vec::new(),
        }
    }

    /// Appends `entry` unless the same entry is already a member.
    pub fn push(&mut self, entry: CatalogEntry) -> bool {
        if self.members.iter().any(|m| m.same_entry(&entry)) {
            return false;
        }
        self.members.push(entry);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// What the reconciler decided to do with a non-empty target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionPlan {
    Create(CollectionTarget),
    /// Full overwrite: every current member is removed, then the target is added.
    Replace {
        existing: CatalogEntry,
        target: CollectionTarget,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("Failed to fetch playlist entries: {0:#}")]
    Fetch(color_eyre::Report),
    #[error("{count} collections are titled '{title}', refusing to pick one")]
    AmbiguousCollection { title: String, count: usize },
    #[error("Failed to update collection '{title}': {reason:#}")]
    Mutation {
        title: String,
        reason: color_eyre::Report,
    },
}

/// Terminal state of one playlist.
#[derive(Debug)]
pub enum PlaylistOutcome {
    Skipped,
    Created,
    Updated,
    Failed(PlaylistError),
}

/// Mirrors playlists onto collections, one playlist at a time.
///
/// Every decision is fed to the run summary and to the event sink. Search failures
/// are returned as errors; anything that only affects the current playlist ends in
/// [`PlaylistOutcome::Failed`] instead.
pub struct CollectionReconciler<'a, M: MediaServer> {
    server: &'a M,
    matcher: TitleMatcher<'a, M>,
    sink: &'a dyn EventSink,
    summary: RunSummary,
    dry_run: bool,
}

impl<'a, M: MediaServer> CollectionReconciler<'a, M> {
    pub fn new(server: &'a M, sink: &'a dyn EventSink, dry_run: bool) -> Self {
        Self {
            server,
            matcher: TitleMatcher::new(server),
            sink,
            summary: RunSummary::new(),
            dry_run,
        }
    }

    fn emit(&mut self, event: SyncEvent) {
        self.summary.record(&event);
        self.sink.emit(&event);
    }

    #[tracing::instrument(skip_all, fields(playlist = %playlist.title))]
    pub async fn reconcile(&mut self, playlist: &PlaylistDescriptor) -> Result<PlaylistOutcome> {
        self.emit(SyncEvent::PlaylistStarted {
            playlist: playlist.title.clone(),
            id: playlist.id.clone(),
        });

        let target = self.resolve_members(playlist).await?;
        if target.is_empty() {
            self.emit(SyncEvent::PlaylistSkipped {
                playlist: playlist.title.clone(),
            });
            return Ok(PlaylistOutcome::Skipped);
        }

        let existing = self
            .matcher
            .match_title(&playlist.title, SearchKind::Collection)
            .await?;
        let plan = match existing {
            TitleMatch::Missing => CollectionPlan::Create(target),
            TitleMatch::Unique(existing) => CollectionPlan::Replace { existing, target },
            TitleMatch::Ambiguous(found) => {
                let error = PlaylistError::AmbiguousCollection {
                    title: playlist.title.clone(),
                    count: found.len(),
                };
                return Ok(self.record_failure(&playlist.title, error));
            }
        };

        match self.apply(&plan).await {
            Ok(outcome) => Ok(outcome),
            Err(reason) => {
                let error = PlaylistError::Mutation {
                    title: playlist.title.clone(),
                    reason,
                };
                Ok(self.record_failure(&playlist.title, error))
            }
        }
    }

    /// Resolves every member title, keeping platform order. Titles that match
    /// nothing or more than one entry are dropped.
    pub async fn resolve_members(
        &mut self,
        playlist: &PlaylistDescriptor,
    ) -> Result<CollectionTarget> {
        let mut target = CollectionTarget::new(playlist.title.clone());

        for video in &playlist.member_titles {
            let matched = self.matcher.match_title(video, SearchKind::Item).await?;
            match matched {
                TitleMatch::Unique(entry) => {
                    self.emit(SyncEvent::VideoMatched {
                        playlist: playlist.title.clone(),
                        video: video.clone(),
                        rating_key: entry.rating_key.clone(),
                    });
                    target.push(entry);
                }
                other => {
                    self.emit(SyncEvent::VideoUnmatched {
                        playlist: playlist.title.clone(),
                        video: video.clone(),
                        candidates: other.candidates(),
                    });
                }
            }
        }

        Ok(target)
    }

    async fn apply(&mut self, plan: &CollectionPlan) -> Result<PlaylistOutcome> {
        match plan {
            CollectionPlan::Create(target) => {
                if !self.dry_run {
                    let created = self
                        .server
                        .create_collection(&target.title, &target.members)
                        .await
                        .wrap_err("Failed to create collection")?;
                    tracing::debug!(rating_key = %created.rating_key, "Collection created");
                }
                self.emit(SyncEvent::CollectionCreated {
                    playlist: target.title.clone(),
                    members: target.members.len(),
                    applied: !self.dry_run,
                });
                Ok(PlaylistOutcome::Created)
            }
            CollectionPlan::Replace { existing, target } => {
                let current = self
                    .server
                    .collection_items(existing)
                    .await
                    .wrap_err("Failed to list collection items")?;

                if !self.dry_run {
                    if !current.is_empty() {
                        self.server
                            .remove_collection_items(existing, &current)
                            .await
                            .wrap_err("Failed to remove collection items")?;
                    }
                    self.server
                        .add_collection_items(existing, &target.members)
                        .await
                        .wrap_err("Failed to add collection items")?;
                }
                self.emit(SyncEvent::CollectionUpdated {
                    playlist: target.title.clone(),
                    removed: current.len(),
                    added: target.members.len(),
                    applied: !self.dry_run,
                });
                Ok(PlaylistOutcome::Updated)
            }
        }
    }

    /// Marks a playlist as failed without stopping the run.
    pub fn record_failure(&mut self, playlist: &str, error: PlaylistError) -> PlaylistOutcome {
        self.emit(SyncEvent::PlaylistFailed {
            playlist: playlist.to_string(),
            reason: error.to_string(),
        });
        PlaylistOutcome::Failed(error)
    }

    pub fn stats(&self) -> RunStats {
        self.summary.report()
    }
}
