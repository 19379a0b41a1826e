/// A track as exported, reduced to the fields the CSV files carry.
///
/// Immutable once fetched; only tracks with a canonical Spotify URL make it
/// this far (items without one are dropped during page conversion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub url: String,
}

impl Track {
    /// The `", "`-joined artist list, as written to the `artists` column.
    #[must_use]
    pub fn artists_joined(&self) -> String {
        self.artists.join(", ")
    }
}

/// A playlist as listed by the API: its raw id and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}
