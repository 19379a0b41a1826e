/// Data entities for tracks and playlists
pub mod entities;
/// Error types, result alias and retry classification
pub mod errors;
/// Spotify API client
pub mod spotify;

pub use spotify::SpotifyClient;

use async_trait::async_trait;

use crate::clients::entities::{Playlist, Track};
use crate::clients::errors::Result;
use crate::pager::{Cursor, RawPage};

/// The remote library boundary, one method per paged resource.
///
/// The exporter takes this as an explicit dependency so tests can swap the
/// real Spotify client for a scripted fake. A `None` cursor requests the
/// first page; the cursors handed back in [`RawPage::next`] are opaque to
/// callers.
#[async_trait]
pub trait LibrarySource {
    /// One page of the user's saved ("liked") tracks.
    async fn saved_tracks_page(&self, cursor: Option<Cursor>) -> Result<RawPage<Track>>;

    /// One page of the user's playlists.
    async fn playlists_page(&self, cursor: Option<Cursor>) -> Result<RawPage<Playlist>>;

    /// One page of a playlist's tracks.
    async fn playlist_items_page(
        &self,
        playlist: &Playlist,
        cursor: Option<Cursor>,
    ) -> Result<RawPage<Track>>;
}
