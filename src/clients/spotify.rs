use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use rspotify::model::{FullTrack, Page, PlayableItem, PlaylistId};
use rspotify::{AuthCodeSpotify, Config, Credentials, OAuth, prelude::*, scopes};
use serde::de::DeserializeOwned;

use crate::clients::LibrarySource;
use crate::clients::entities::{Playlist, Track};
use crate::clients::errors::{Error, Result};
use crate::pager::{Cursor, RawPage};

/// Page size for saved tracks and for the playlist list.
const LIST_PAGE_SIZE: u32 = 50;
/// Page size for a playlist's items.
const PLAYLIST_ITEMS_PAGE_SIZE: u32 = 100;

pub struct SpotifyClient {
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    #[must_use]
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Authorize the Spotify client via CLI prompt and OAuth flow
    // This function requires the `cli` feature of rspotify.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    // Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = Credentials::from_env().ok_or_else(|| {
            Error::Configuration(
                "Missing Spotify credentials in environment variables. Check README.md for details.".into(),
            )
        })?;
        let oauth = OAuth::from_env(scopes!(
            "user-library-read",
            "playlist-read-private",
            "playlist-read-collaborative"
        ))
        .ok_or_else(|| {
            Error::Configuration(
                "Missing Spotify OAuth configuration in environment variables. Check README.md for details.".into(),
            )
        })?;

        // Set up token caching in a default cache directory
        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".rexporter_token_cache");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self { spotify })
    }
}

#[async_trait]
impl LibrarySource for SpotifyClient {
    async fn saved_tracks_page(&self, cursor: Option<Cursor>) -> Result<RawPage<Track>> {
        let page = self
            .spotify
            .current_user_saved_tracks_manual(
                None,
                Some(LIST_PAGE_SIZE),
                Some(cursor.unwrap_or(0)),
            )
            .await?;
        let next = next_cursor(&page);
        Ok(RawPage {
            items: page
                .items
                .into_iter()
                .filter_map(|saved| track_from_full(saved.track))
                .collect(),
            next,
        })
    }

    async fn playlists_page(&self, cursor: Option<Cursor>) -> Result<RawPage<Playlist>> {
        let page = self
            .spotify
            .current_user_playlists_manual(Some(LIST_PAGE_SIZE), Some(cursor.unwrap_or(0)))
            .await?;
        let next = next_cursor(&page);
        Ok(RawPage {
            items: page
                .items
                .into_iter()
                .map(|pl| Playlist {
                    id: pl.id.id().to_string(),
                    name: pl.name,
                })
                .collect(),
            next,
        })
    }

    async fn playlist_items_page(
        &self,
        playlist: &Playlist,
        cursor: Option<Cursor>,
    ) -> Result<RawPage<Track>> {
        let id = PlaylistId::from_id(playlist.id.clone())?;
        let page = self
            .spotify
            .playlist_items_manual(
                id,
                None,
                None,
                Some(PLAYLIST_ITEMS_PAGE_SIZE),
                Some(cursor.unwrap_or(0)),
            )
            .await?;
        let next = next_cursor(&page);
        Ok(RawPage {
            items: page
                .items
                .into_iter()
                .filter_map(|item| match item.track {
                    // Episodes and removed/local entries have no track to export.
                    Some(PlayableItem::Track(track)) => track_from_full(track),
                    _ => None,
                })
                .collect(),
            next,
        })
    }
}

/// Offset of the page after `page`, if the server advertised one.
fn next_cursor<T: DeserializeOwned>(page: &Page<T>) -> Option<Cursor> {
    page.next
        .as_ref()
        .map(|_| page.offset + page.items.len() as u32)
}

/// The canonical open.spotify.com URL, if the track has a usable one.
fn spotify_url(external_urls: &HashMap<String, String>) -> Option<String> {
    external_urls
        .get("spotify")
        .filter(|url| !url.is_empty())
        .cloned()
}

/// Convert an API track into the exported shape, dropping tracks without a
/// canonical URL.
fn track_from_full(track: FullTrack) -> Option<Track> {
    let url = spotify_url(&track.external_urls)?;
    Some(Track {
        name: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        album: track.album.name,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_requires_a_non_empty_spotify_entry() {
        let mut urls = HashMap::new();
        assert_eq!(spotify_url(&urls), None);

        urls.insert("spotify".to_string(), String::new());
        assert_eq!(spotify_url(&urls), None);

        urls.insert(
            "spotify".to_string(),
            "https://open.spotify.com/track/abc".to_string(),
        );
        assert_eq!(
            spotify_url(&urls).as_deref(),
            Some("https://open.spotify.com/track/abc")
        );
    }

    fn page(items: Vec<i32>, offset: u32, next: Option<&str>) -> Page<i32> {
        Page {
            href: String::new(),
            items,
            limit: 50,
            next: next.map(String::from),
            offset,
            previous: None,
            total: 54,
        }
    }

    #[test]
    fn next_cursor_follows_the_server_link() {
        let first = page(
            vec![1, 2, 3],
            50,
            Some("https://api.spotify.com/v1/me/tracks?offset=53"),
        );
        assert_eq!(next_cursor(&first), Some(53));

        let last = page(vec![4], 53, None);
        assert_eq!(next_cursor(&last), None);
    }
}
