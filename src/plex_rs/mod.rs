use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub mod collection;
pub mod library;

/// Docs:
/// https://developer.plex.tv/pms/#section/API-Info/Authenticating-with-Plex
pub const TOKEN_HEADER: &str = "X-Plex-Token";

/* ---------- Shared container ---------- */

/// A minimal Plex JSON envelope for list style endpoints that return `MediaContainer.Metadata`.
///
/// Notes
/// - Plex responses are wrapped in a top level `MediaContainer`.
/// - `metadata` defaults to an empty vec when missing (empty collections omit it).
#[derive(Debug, Clone, Deserialize)]
pub struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: PlexMediaContainer<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexMediaContainer<T> {
    #[serde(rename = "Metadata", default = "Vec::new")]
    pub metadata: Vec<T>,
}

/// A library item or collection as returned by search and collection endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlexMetadata {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,

    pub title: String,

    #[serde(rename = "type")]
    pub item_type: String,
}

/* ---------- Identity (machineIdentifier) ---------- */

#[derive(Debug, Clone, Deserialize)]
struct PlexIdentityResponse {
    #[serde(rename = "MediaContainer")]
    media_container: PlexIdentity,
}

#[derive(Debug, Clone, Deserialize)]
struct PlexIdentity {
    #[serde(rename = "machineIdentifier")]
    machine_identifier: String,
}

/// Endpoint
/// - `GET /identity`
pub async fn get_machine_identifier(
    client: &Client,
    base_url: &Url,
    user_token: &str,
) -> Result<String> {
    let url = base_url.join("identity")?;

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexIdentityResponse>()
        .await
        .wrap_err("Failed to deserialize Plex identity response")?;

    Ok(res.media_container.machine_identifier)
}

/// Builds the `server://` URI Plex uses to reference library items in bulk.
pub fn library_items_uri(machine_identifier: &str, rating_keys: &[&str]) -> String {
    format!(
        "server://{}/com.plexapp.plugins.library/library/metadata/{}",
        machine_identifier,
        rating_keys.join(",")
    )
}

/// Numeric search type for a Plex item type name.
pub fn search_type_id(item_type: &str) -> Option<u32> {
    let id = match item_type {
        "movie" => 1,
        "show" => 2,
        "season" => 3,
        "episode" => 4,
        "artist" => 8,
        "album" => 9,
        "track" => 10,
        "clip" => 12,
        "photo" => 13,
        "collection" => 18,
        _ => return None,
    };
    Some(id)
}
