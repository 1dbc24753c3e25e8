pub mod extractor;
pub mod types;

pub use extractor::YtDlpExtractor;

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Turns a channel id, `@handle` or channel URL into the channel's base URL.
pub fn channel_url(channel: &str) -> String {
    let channel = channel.trim();
    if channel.starts_with("http://") || channel.starts_with("https://") {
        channel.trim_end_matches('/').to_string()
    } else if channel.starts_with('@') {
        format!("{}/{}", YOUTUBE_BASE_URL, channel)
    } else {
        format!("{}/channel/{}", YOUTUBE_BASE_URL, channel)
    }
}

/// The channel's playlist tab, most recently updated first.
pub fn playlists_index_url(channel: &str) -> String {
    format!("{}/playlists?view=1&sort=dd&shelf_id=0", channel_url(channel))
}

pub fn playlist_url_for_id(playlist_id: &str) -> String {
    format!("{}/playlist?list={}", YOUTUBE_BASE_URL, playlist_id)
}
