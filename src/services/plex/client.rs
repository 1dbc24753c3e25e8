use color_eyre::eyre::{OptionExt, Result, eyre};
use reqwest::Client;
use url::Url;

use crate::plex_rs::collection::{
    add_items_to_collection, create_collection, get_collection_items, remove_item_from_collection,
};
use crate::plex_rs::library::{
    PlexLibrarySection, find_section_by_title, get_library_sections, search_section,
};
use crate::plex_rs::{PlexMetadata, get_machine_identifier, library_items_uri, search_type_id};
use crate::ports::media_server::{CatalogEntry, MediaServer, SearchKind};

const COLLECTION_TYPE: &str = "collection";

/// [`MediaServer`] backed by the Plex HTTP API, scoped to one library section.
pub struct PlexHttpAdapter {
    client: Client,
    server_url: Url,
    token: String,
    section_id: String,
    machine_identifier: String,
}

impl PlexHttpAdapter {
    /// Resolves the library section by title and the server's machine identifier.
    pub async fn connect(server_url: Url, token: String, library: &str) -> Result<Self> {
        let client = Client::new();

        let sections = get_library_sections(&client, &server_url, &token).await?;
        let section_id = find_section_by_title(&sections, library)
            .map(|s| s.key.clone())
            .ok_or_else(|| {
                eyre!(
                    "Library '{}' not found on Plex server (available: {})",
                    library,
                    describe_sections(&sections)
                )
            })?;
        let machine_identifier = get_machine_identifier(&client, &server_url, &token).await?;

        tracing::debug!(
            section_id = %section_id,
            machine_identifier = %machine_identifier,
            "Connected to Plex library '{}'",
            library
        );

        Ok(Self {
            client,
            server_url,
            token,
            section_id,
            machine_identifier,
        })
    }

    fn items_uri(&self, items: &[CatalogEntry]) -> String {
        let keys: Vec<&str> = items.iter().map(|i| i.rating_key.as_str()).collect();
        library_items_uri(&self.machine_identifier, &keys)
    }
}

fn describe_sections(sections: &[PlexLibrarySection]) -> String {
    sections
        .iter()
        .map(|s| format!("{} ({})", s.title, s.section_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plex mixes collections into section searches; keep only what `kind` asks for.
fn matches_kind(item_type: &str, kind: SearchKind) -> bool {
    match kind {
        SearchKind::Item => item_type != COLLECTION_TYPE,
        SearchKind::Collection => item_type == COLLECTION_TYPE,
    }
}

impl From<PlexMetadata> for CatalogEntry {
    fn from(metadata: PlexMetadata) -> Self {
        CatalogEntry {
            rating_key: metadata.rating_key,
            title: metadata.title,
            kind: metadata.item_type,
        }
    }
}

#[async_trait::async_trait]
impl MediaServer for PlexHttpAdapter {
    async fn search_by_title(&self, title: &str, kind: SearchKind) -> Result<Vec<CatalogEntry>> {
        let item_type = match kind {
            SearchKind::Item => None,
            SearchKind::Collection => Some(COLLECTION_TYPE),
        };
        let hits = search_section(
            &self.client,
            &self.server_url,
            &self.token,
            &self.section_id,
            title,
            item_type,
        )
        .await?;

        Ok(hits
            .into_iter()
            .filter(|h| matches_kind(&h.item_type, kind))
            .map(CatalogEntry::from)
            .collect())
    }

    async fn create_collection(
        &self,
        title: &str,
        items: &[CatalogEntry],
    ) -> Result<CatalogEntry> {
        let first = items
            .first()
            .ok_or_eyre("Refusing to create an empty collection")?;
        let type_id = search_type_id(&first.kind)
            .ok_or_else(|| eyre!("Unsupported Plex item type '{}'", first.kind))?;

        let created = create_collection(
            &self.client,
            &self.server_url,
            &self.token,
            &self.section_id,
            title,
            type_id,
            &self.items_uri(items),
        )
        .await?;

        Ok(created.into())
    }

    async fn collection_items(&self, collection: &CatalogEntry) -> Result<Vec<CatalogEntry>> {
        let items = get_collection_items(
            &self.client,
            &self.server_url,
            &self.token,
            &collection.rating_key,
        )
        .await?;
        Ok(items.into_iter().map(CatalogEntry::from).collect())
    }

    async fn remove_collection_items(
        &self,
        collection: &CatalogEntry,
        items: &[CatalogEntry],
    ) -> Result<()> {
        // Plex only removes collection items one at a time
        for item in items {
            remove_item_from_collection(
                &self.client,
                &self.server_url,
                &self.token,
                &collection.rating_key,
                &item.rating_key,
            )
            .await?;
        }
        Ok(())
    }

    async fn add_collection_items(
        &self,
        collection: &CatalogEntry,
        items: &[CatalogEntry],
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        add_items_to_collection(
            &self.client,
            &self.server_url,
            &self.token,
            &collection.rating_key,
            &self.items_uri(items),
        )
        .await
    }
}
