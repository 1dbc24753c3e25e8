use color_eyre::eyre::Result;

/// One row of a flattened listing: a playlist in a channel's playlist index,
/// or a video in a playlist. Nothing beyond the listing itself is resolved.
///
/// `title` is `None` when the platform listed the row without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Decoupled representation of a flattened extraction result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatListing {
    pub title: Option<String>,
    pub entries: Vec<FlatEntry>,
}

/// Port trait wrapping the video platform metadata extraction used by the sync.
///
/// Implementations live in `services::youtube` (production) or test mocks.
/// Extraction is always "flat": no per-entry detail lookups and no downloads.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlatformExtractor: Send + Sync {
    async fn extract_flat(&self, url: &str) -> Result<FlatListing>;
}
