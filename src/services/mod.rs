pub mod collection_sync;
pub mod plex;
pub mod youtube;
