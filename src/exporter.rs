use std::collections::HashMap;

use log::{info, warn};

use crate::clients::LibrarySource;
use crate::clients::entities::Track;
use crate::pager::PageWalker;
use crate::retry::Retrier;
use crate::sanitize::sanitize_name;

/// Reserved container name for the user's saved tracks.
pub const LIKED_SONGS: &str = "Liked Songs";

/// The harvested library: sanitized container name to its tracks.
pub type Library = HashMap<String, Vec<Track>>;

/// Walks the whole library of a [`LibrarySource`] into a [`Library`].
///
/// Failures never escape: a playlist whose pages cannot be read stays in
/// the result with an empty track list, and only a failure to read the
/// playlist list itself empties the whole result.
pub struct Exporter<S> {
    source: S,
    retrier: Retrier,
}

impl<S: LibrarySource> Exporter<S> {
    #[must_use]
    pub fn new(source: S, retrier: Retrier) -> Self {
        Exporter { source, retrier }
    }

    /// Fetch liked songs and every playlist, one remote call at a time.
    pub async fn fetch_library(&self) -> Library {
        let walker = PageWalker::new(&self.retrier);
        let mut library = Library::new();

        info!("Fetching liked songs ...");
        let liked = walker
            .collect("liked songs", |cursor| {
                self.source.saved_tracks_page(cursor)
            })
            .await;
        if liked.aborted {
            warn!("Liked songs could not be read; keeping them empty");
        } else {
            info!("Fetched {} liked songs", liked.items.len());
        }
        library.insert(LIKED_SONGS.to_string(), liked.items);

        info!("Fetching playlists ...");
        let playlists = walker
            .collect("playlist list", |cursor| self.source.playlists_page(cursor))
            .await;
        if playlists.aborted {
            warn!("Could not fetch the playlist list; nothing to export");
            return Library::new();
        }

        for playlist in playlists.items {
            let name = sanitize_name(&playlist.name);
            info!("Fetching playlist: {name}");
            let tracks = walker
                .collect(&format!("playlist {name}"), |cursor| {
                    self.source.playlist_items_page(&playlist, cursor)
                })
                .await;
            if tracks.aborted {
                warn!("Playlist {name} could not be read; keeping it empty");
            }
            // Two names sanitizing to the same key overwrite each other.
            library.insert(name, tracks.items);
        }

        library
    }
}
