use color_eyre::eyre::{Result, WrapErr};

use crate::ports::media_server::{CatalogEntry, MediaServer, SearchKind};

/// Result of resolving a title against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleMatch {
    Missing,
    Unique(CatalogEntry),
    /// More than one entry carries the exact title.
    Ambiguous(Vec<CatalogEntry>),
}

impl TitleMatch {
    /// Keeps only hits whose title is byte-for-byte equal to `title`.
    pub fn from_hits(title: &str, hits: Vec<CatalogEntry>) -> Self {
        let mut exact: Vec<CatalogEntry> = hits.into_iter().filter(|h| h.title == title).collect();
        match exact.len() {
            0 => TitleMatch::Missing,
            1 => TitleMatch::Unique(exact.remove(0)),
            _ => TitleMatch::Ambiguous(exact),
        }
    }

    pub fn candidates(&self) -> usize {
        match self {
            TitleMatch::Missing => 0,
            TitleMatch::Unique(_) => 1,
            TitleMatch::Ambiguous(entries) => entries.len(),
        }
    }
}

/// Exact, case sensitive title lookups against the media server.
pub struct TitleMatcher<'a, M: MediaServer> {
    server: &'a M,
}

impl<'a, M: MediaServer> TitleMatcher<'a, M> {
    pub fn new(server: &'a M) -> Self {
        Self { server }
    }

    /// Search errors are returned as-is: without search the run cannot progress.
    pub async fn match_title(&self, title: &str, kind: SearchKind) -> Result<TitleMatch> {
        let hits = self
            .server
            .search_by_title(title, kind)
            .await
            .wrap_err_with(|| format!("Failed to search library for '{}'", title))?;
        Ok(TitleMatch::from_hits(title, hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::media_server::MockMediaServer;

    fn entry(key: &str, title: &str) -> CatalogEntry {
        CatalogEntry {
            rating_key: key.into(),
            title: title.into(),
            kind: "movie".into(),
        }
    }

    #[test]
    fn test_from_hits_is_exact_and_case_sensitive() {
        let hits = vec![entry("1", "intro"), entry("2", "Intro (Live)")];
        assert_eq!(TitleMatch::from_hits("Intro", hits), TitleMatch::Missing);

        let hits = vec![entry("1", "Intro"), entry("2", "Intro (Live)")];
        assert_eq!(
            TitleMatch::from_hits("Intro", hits),
            TitleMatch::Unique(entry("1", "Intro"))
        );
    }

    #[test]
    fn test_from_hits_ambiguous() {
        let hits = vec![entry("1", "Intro"), entry("2", "Intro")];
        let matched = TitleMatch::from_hits("Intro", hits);
        assert!(matches!(matched, TitleMatch::Ambiguous(_)));
        assert_eq!(matched.candidates(), 2);
    }

    #[tokio::test]
    async fn test_match_title_passes_kind() {
        let mut server = MockMediaServer::new();
        server
            .expect_search_by_title()
            .withf(|title, kind| title == "Favorites" && *kind == SearchKind::Collection)
            .times(1)
            .returning(|_, _| {
                Ok(vec![CatalogEntry {
                    rating_key: "900".into(),
                    title: "Favorites".into(),
                    kind: "collection".into(),
                }])
            });

        let matcher = TitleMatcher::new(&server);
        let matched = matcher
            .match_title("Favorites", SearchKind::Collection)
            .await
            .unwrap();

        assert_eq!(matched.candidates(), 1);
    }

    #[tokio::test]
    async fn test_match_title_search_error() {
        let mut server = MockMediaServer::new();
        server
            .expect_search_by_title()
            .returning(|_, _| Err(color_eyre::eyre::eyre!("connection refused")));

        let matcher = TitleMatcher::new(&server);
        let result = matcher.match_title("A", SearchKind::Item).await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to search library for 'A'")
        );
    }
}
