use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::clients::errors::Result;
use crate::exporter::Library;

/// Column order shared by the writer and the reader.
pub const HEADERS: [&str; 4] = ["name", "artists", "album", "url"];

/// One row of an exported playlist file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub url: String,
}

/// Path of the CSV file for a (sanitized) container name.
#[must_use]
pub fn playlist_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.csv"))
}

/// Write one CSV per container under `dir`, creating it if needed.
///
/// The header row is written even for an empty container, so every
/// harvested playlist leaves a file behind.
pub fn write_library(dir: &Path, library: &Library) -> Result<()> {
    info!("Saving CSVs for each playlist ...");
    fs::create_dir_all(dir)?;

    for (name, tracks) in library {
        let path = playlist_path(dir, name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(HEADERS)?;
        for track in tracks {
            let artists = track.artists_joined();
            writer.write_record([
                track.name.as_str(),
                artists.as_str(),
                track.album.as_str(),
                track.url.as_str(),
            ])?;
        }
        writer.flush()?;
        info!("Saved: {}", path.display());
    }
    Ok(())
}

/// Read the rows of one exported playlist file.
///
/// Rows the CSV reader cannot decode are warned about and skipped; rows
/// with a blank `name` are kept here and filtered by the consumer.
pub fn read_rows(path: &Path) -> Result<Vec<TrackRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => warn!("{}: skipping malformed row: {e}", path.display()),
        }
    }
    Ok(rows)
}
