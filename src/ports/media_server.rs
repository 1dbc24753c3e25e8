use color_eyre::eyre::Result;

/// Which kind of library entry a title search is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Plain media items (movies, episodes, clips, ...).
    Item,
    /// Collection entities.
    Collection,
}

/// Handle to an entry owned by the media server.
///
/// Two handles refer to the same entry when their `rating_key`s are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub rating_key: String,
    pub title: String,
    /// Server side type name, e.g. `movie`, `episode` or `collection`.
    pub kind: String,
}

impl CatalogEntry {
    pub fn same_entry(&self, other: &CatalogEntry) -> bool {
        self.rating_key == other.rating_key
    }
}

/// Port trait wrapping the media server capabilities used by the collection sync.
///
/// Implementations live in `services::plex::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaServer: Send + Sync {
    /// Title search within the configured library. May return near matches;
    /// callers needing exact semantics filter the result themselves.
    async fn search_by_title(&self, title: &str, kind: SearchKind) -> Result<Vec<CatalogEntry>>;

    async fn create_collection(&self, title: &str, items: &[CatalogEntry])
    -> Result<CatalogEntry>;

    async fn collection_items(&self, collection: &CatalogEntry) -> Result<Vec<CatalogEntry>>;

    async fn remove_collection_items(
        &self,
        collection: &CatalogEntry,
        items: &[CatalogEntry],
    ) -> Result<()>;

    async fn add_collection_items(
        &self,
        collection: &CatalogEntry,
        items: &[CatalogEntry],
    ) -> Result<()>;
}
