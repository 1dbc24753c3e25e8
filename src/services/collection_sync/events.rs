use tracing::Level;

/// Everything worth reporting while a channel is being synced.
///
/// Events are fed to the [`RunSummary`](super::summary::RunSummary) for counting and to an
/// [`EventSink`] for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    PlaylistStarted {
        playlist: String,
        id: String,
    },
    VideoMatched {
        playlist: String,
        video: String,
        rating_key: String,
    },
    /// A member title that resolved to no entry, or to more than one.
    VideoUnmatched {
        playlist: String,
        video: String,
        candidates: usize,
    },
    /// Nothing in the playlist resolved, so no collection was touched.
    PlaylistSkipped { playlist: String },
    CollectionCreated {
        playlist: String,
        members: usize,
        applied: bool,
    },
    CollectionUpdated {
        playlist: String,
        removed: usize,
        added: usize,
        applied: bool,
    },
    PlaylistFailed { playlist: String, reason: String },
}

impl SyncEvent {
    pub fn level(&self) -> Level {
        match self {
            SyncEvent::PlaylistStarted { .. } | SyncEvent::VideoMatched { .. } => Level::DEBUG,
            SyncEvent::VideoUnmatched { .. } | SyncEvent::PlaylistSkipped { .. } => Level::WARN,
            SyncEvent::CollectionCreated { .. } | SyncEvent::CollectionUpdated { .. } => {
                Level::INFO
            }
            SyncEvent::PlaylistFailed { .. } => Level::ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SyncEvent::PlaylistStarted { playlist, id } => {
                format!("Processing playlist '{}' ({})", playlist, id)
            }
            SyncEvent::VideoMatched { video, .. } => {
                format!("Video with name '{}' found in library", video)
            }
            SyncEvent::VideoUnmatched {
                video, candidates, ..
            } => match candidates {
                0 => format!("Video with name '{}' not found in library", video),
                n => format!(
                    "Video with name '{}' is ambiguous ({} library items share it)",
                    video, n
                ),
            },
            SyncEvent::PlaylistSkipped { playlist } => format!(
                "Skipping playlist '{}' as no videos exist in the library",
                playlist
            ),
            SyncEvent::CollectionCreated {
                playlist,
                members,
                applied,
            } => format!(
                "{} collection '{}' with {} items",
                if *applied { "Created" } else { "Would create" },
                playlist,
                members
            ),
            SyncEvent::CollectionUpdated {
                playlist,
                removed,
                added,
                applied,
            } => format!(
                "{} collection '{}' ({} removed, {} added)",
                if *applied { "Updated" } else { "Would update" },
                playlist,
                removed,
                added
            ),
            SyncEvent::PlaylistFailed { playlist, reason } => {
                format!("Failed to sync playlist '{}': {}", playlist, reason)
            }
        }
    }
}

/// Leveled destination for [`SyncEvent`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SyncEvent);
}

/// Discards every event.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[cfg(test)]
impl EventSink for NoopEventSink {
    fn emit(&self, _event: &SyncEvent) {}
}

/// Forwards events to `tracing` at the level the event carries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &SyncEvent) {
        let message = event.message();
        // tracing macros need the level at compile time
        match event.level() {
            Level::ERROR => tracing::error!(event = ?event, "{}", message),
            Level::WARN => tracing::warn!(event = ?event, "{}", message),
            Level::INFO => tracing::info!(event = ?event, "{}", message),
            Level::DEBUG => tracing::debug!(event = ?event, "{}", message),
            _ => tracing::trace!(event = ?event, "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(event: &SyncEvent) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || TracingEventSink.emit(event));
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_levels() {
        let unmatched = SyncEvent::VideoUnmatched {
            playlist: "Favorites".into(),
            video: "B".into(),
            candidates: 0,
        };
        assert_eq!(unmatched.level(), Level::WARN);

        let failed = SyncEvent::PlaylistFailed {
            playlist: "Favorites".into(),
            reason: "boom".into(),
        };
        assert_eq!(failed.level(), Level::ERROR);

        let matched = SyncEvent::VideoMatched {
            playlist: "Favorites".into(),
            video: "A".into(),
            rating_key: "1".into(),
        };
        assert_eq!(matched.level(), Level::DEBUG);
    }

    #[test]
    fn test_unmatched_message_mentions_ambiguity() {
        let ambiguous = SyncEvent::VideoUnmatched {
            playlist: "Favorites".into(),
            video: "Intro".into(),
            candidates: 2,
        };
        assert!(ambiguous.message().contains("ambiguous"));

        let dry = SyncEvent::CollectionCreated {
            playlist: "Favorites".into(),
            members: 1,
            applied: false,
        };
        assert!(dry.message().starts_with("Would create"));
    }

    #[test]
    fn test_tracing_sink_attaches_fields_at_every_level() {
        let unmatched = capture(&SyncEvent::VideoUnmatched {
            playlist: "Favorites".into(),
            video: "B".into(),
            candidates: 0,
        });
        assert!(unmatched.contains("WARN"));
        assert!(unmatched.contains("event=VideoUnmatched"));
        assert!(unmatched.contains(r#"video: "B""#));

        let created = capture(&SyncEvent::CollectionCreated {
            playlist: "Favorites".into(),
            members: 2,
            applied: true,
        });
        assert!(created.contains("INFO"));
        assert!(created.contains("event=CollectionCreated"));

        let matched = capture(&SyncEvent::VideoMatched {
            playlist: "Favorites".into(),
            video: "A".into(),
            rating_key: "1".into(),
        });
        assert!(matched.contains("DEBUG"));
        assert!(matched.contains(r#"rating_key: "1""#));
    }
}
