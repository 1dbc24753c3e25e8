use std::sync::Mutex;

use color_eyre::eyre::{OptionExt, Result};

use crate::ports::media_server::{CatalogEntry, MediaServer, SearchKind};
use crate::services::collection_sync::events::{EventSink, SyncEvent};

/// Keeps every emitted event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &SyncEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    items: Vec<CatalogEntry>,
    collections: Vec<(CatalogEntry, Vec<CatalogEntry>)>,
    next_key: u32,
    mutations: usize,
}

/// Media server that keeps its library in memory. Title search behaves like Plex:
/// a case insensitive substring filter.
#[derive(Debug, Default)]
pub struct InMemoryMediaServer {
    state: Mutex<CatalogState>,
}

impl InMemoryMediaServer {
    pub fn with_items(titles: &[&str]) -> Self {
        let server = Self::default();
        {
            let mut state = server.state.lock().unwrap();
            for title in titles {
                state.next_key += 1;
                let entry = CatalogEntry {
                    rating_key: state.next_key.to_string(),
                    title: title.to_string(),
                    kind: "movie".to_string(),
                };
                state.items.push(entry);
            }
        }
        server
    }

    pub fn collection_members(&self, title: &str) -> Option<Vec<String>> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .iter()
            .find(|(c, _)| c.title == title)
            .map(|(_, members)| members.iter().map(|m| m.title.clone()).collect())
    }

    pub fn collection_count(&self) -> usize {
        self.state.lock().unwrap().collections.len()
    }

    pub fn mutation_count(&self) -> usize {
        self.state.lock().unwrap().mutations
    }
}

#[async_trait::async_trait]
impl MediaServer for InMemoryMediaServer {
    async fn search_by_title(&self, title: &str, kind: SearchKind) -> Result<Vec<CatalogEntry>> {
        let needle = title.to_lowercase();
        let state = self.state.lock().unwrap();
        let hits = match kind {
            SearchKind::Item => state.items.iter().collect::<Vec<_>>(),
            SearchKind::Collection => state.collections.iter().map(|(c, _)| c).collect(),
        };
        Ok(hits
            .into_iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_collection(
        &self,
        title: &str,
        items: &[CatalogEntry],
    ) -> Result<CatalogEntry> {
        let mut state = self.state.lock().unwrap();
        state.next_key += 1;
        state.mutations += 1;
        let collection = CatalogEntry {
            rating_key: state.next_key.to_string(),
            title: title.to_string(),
            kind: "collection".to_string(),
        };
        state.collections.push((collection.clone(), items.to_vec()));
        Ok(collection)
    }

    async fn collection_items(&self, collection: &CatalogEntry) -> Result<Vec<CatalogEntry>> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .iter()
            .find(|(c, _)| c.same_entry(collection))
            .map(|(_, members)| members.clone())
            .ok_or_eyre("Collection not found")
    }

    async fn remove_collection_items(
        &self,
        collection: &CatalogEntry,
        items: &[CatalogEntry],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        let (_, members) = state
            .collections
            .iter_mut()
            .find(|(c, _)| c.same_entry(collection))
            .ok_or_eyre("Collection not found")?;
        members.retain(|m| !items.iter().any(|i| i.same_entry(m)));
        Ok(())
    }

    async fn add_collection_items(
        &self,
        collection: &CatalogEntry,
        items: &[CatalogEntry],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        let (_, members) = state
            .collections
            .iter_mut()
            .find(|(c, _)| c.same_entry(collection))
            .ok_or_eyre("Collection not found")?;
        members.extend(items.iter().cloned());
        Ok(())
    }
}
