use color_eyre::eyre::{OptionExt, Result, WrapErr};
use reqwest::Client;
use url::Url;

use super::{PlexMetadata, PlexResponse, TOKEN_HEADER};

/* ---------- Create collection ---------- */

/// Create a regular (non smart) collection in a section, seeded with items.
///
/// Endpoint
/// - `POST /library/collections?type=..&title=..&smart=0&sectionId=..&uri=server://...`
pub async fn create_collection(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    section_id: &str,
    title: &str,
    type_id: u32,
    items_uri: &str,
) -> Result<PlexMetadata> {
    let mut url = base_url.join("library/collections")?;
    url.query_pairs_mut()
        .append_pair("type", &type_id.to_string())
        .append_pair("title", title)
        .append_pair("smart", "0")
        .append_pair("sectionId", section_id)
        .append_pair("uri", items_uri);

    let res = client
        .post(url)
        .header("Accept", "application/json")
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexResponse<PlexMetadata>>()
        .await
        .wrap_err("Failed to deserialize create collection response")?;

    res.media_container
        .metadata
        .into_iter()
        .next()
        .ok_or_eyre("Create collection response had no Metadata")
}

/* ---------- Collection items ---------- */

/// Endpoint
/// - `GET /library/collections/{id}/children`
pub async fn get_collection_items(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    collection_id: &str,
) -> Result<Vec<PlexMetadata>> {
    let url = base_url.join(&format!("library/collections/{}/children", collection_id))?;

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexResponse<PlexMetadata>>()
        .await
        .wrap_err("Failed to deserialize collection items response")?;

    Ok(res.media_container.metadata)
}

/* ---------- Add and remove ---------- */

/// Endpoint
/// - `PUT /library/collections/{id}/items?uri=server://...`
pub async fn add_items_to_collection(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    collection_id: &str,
    items_uri: &str,
) -> Result<()> {
    let mut url = base_url.join(&format!("library/collections/{}/items", collection_id))?;
    url.query_pairs_mut().append_pair("uri", items_uri);

    client
        .put(url)
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()
        .wrap_err("Failed to add items to collection")?;

    Ok(())
}

/// Endpoint
/// - `DELETE /library/collections/{id}/items/{item}`
pub async fn remove_item_from_collection(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    collection_id: &str,
    item_rating_key: &str,
) -> Result<()> {
    let url = base_url.join(&format!(
        "library/collections/{}/items/{}",
        collection_id, item_rating_key
    ))?;

    client
        .delete(url)
        .header(TOKEN_HEADER, user_token)
        .send()
        .await?
        .error_for_status()
        .wrap_err("Failed to remove item from collection")?;

    Ok(())
}
