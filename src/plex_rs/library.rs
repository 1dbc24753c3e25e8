use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{PlexMetadata, PlexResponse, TOKEN_HEADER, search_type_id};

/* ---------- Library sections ---------- */

/// Response type for `/library/sections`.
#[derive(Debug, Deserialize)]
pub struct PlexLibrarySectionsResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: PlexLibrarySectionsContainer,
}

/// `MediaContainer` for `/library/sections` which returns a `Directory` list.
#[derive(Debug, Deserialize)]
pub struct PlexLibrarySectionsContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<PlexLibrarySection>,
}

/// A Plex library section.
///
/// Notes
/// - `key` is the library section id.
/// - `section_type` is commonly `movie`, `show`, `artist` or `photo`.
#[derive(Debug, Deserialize)]
pub struct PlexLibrarySection {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: String,
}

/// Fetch all Plex library sections.
///
/// Endpoint
/// - `GET /library/sections`
pub async fn get_library_sections(
    client: &Client,
    base_url: &Url,
    user_token: &str,
) -> Result<Vec<PlexLibrarySection>> {
    let url = base_url.join("library/sections")?;

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexLibrarySectionsResponse>()
        .await
        .wrap_err("Failed to deserialize library sections")?;

    Ok(res.media_container.directories)
}

/// Find a section by its exact title.
pub fn find_section_by_title<'a>(
    sections: &'a [PlexLibrarySection],
    title: &str,
) -> Option<&'a PlexLibrarySection> {
    sections.iter().find(|s| s.title == title)
}

/* ---------- Search ---------- */

/// Search a section by title.
///
/// Endpoint
/// - `GET /library/sections/{id}/all?title=...[&type=...]`
///
/// Notes
/// - Plex treats `title` as a case insensitive substring filter.
/// - Without `item_type` the section's default type is searched.
pub async fn search_section(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    section_id: &str,
    title: &str,
    item_type: Option<&str>,
) -> Result<Vec<PlexMetadata>> {
    let mut url = base_url.join(&format!("library/sections/{}/all", section_id))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("title", title);
        if let Some(type_id) = item_type.and_then(search_type_id) {
            query.append_pair("type", &type_id.to_string());
        }
    }

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexResponse<PlexMetadata>>()
        .await
        .wrap_err("Failed to deserialize library search response")?;

    Ok(res.media_container.metadata)
}
