use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::process::Command;

use crate::clients::errors::Result;
use crate::playlist_files;

const AUDIO_FORMAT: &str = "mp3";
const AUDIO_QUALITY: &str = "192K";

/// Runs yt-dlp over the rows of exported playlist files.
///
/// Each playlist file gets its own folder under `downloads_dir`; each row
/// becomes a `ytsearch1:` query for the best audio match. A track whose
/// download fails is logged and skipped; a yt-dlp binary that cannot be
/// spawned at all aborts the run.
pub struct Downloader {
    ytdlp_bin: PathBuf,
    downloads_dir: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

impl Downloader {
    #[must_use]
    pub fn new(ytdlp_bin: PathBuf, downloads_dir: PathBuf, ffmpeg_location: Option<PathBuf>) -> Self {
        Downloader {
            ytdlp_bin,
            downloads_dir,
            ffmpeg_location,
        }
    }

    /// Process every `*.csv` file in `playlists_dir`.
    pub async fn run(&self, playlists_dir: &Path) -> Result<()> {
        for entry in fs::read_dir(playlists_dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                self.process_playlist(&path).await?;
            }
        }
        Ok(())
    }

    async fn process_playlist(&self, csv_path: &Path) -> Result<()> {
        let Some(name) = csv_path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!("Skipping file with unreadable name: {}", csv_path.display());
            return Ok(());
        };
        info!("Processing playlist: {name}");

        let out_dir = self.downloads_dir.join(name);
        fs::create_dir_all(&out_dir)?;

        for row in playlist_files::read_rows(csv_path)? {
            let track = row.name.trim();
            if track.is_empty() {
                info!("Skipping row with no track name");
                continue;
            }
            let query = search_query(track, row.artists.trim());
            self.download_track(&query, &out_dir).await?;
        }
        Ok(())
    }

    async fn download_track(&self, query: &str, out_dir: &Path) -> Result<()> {
        info!("Searching: {query}");
        let status = Command::new(&self.ytdlp_bin)
            .args(self.command_args(query, out_dir))
            .status()
            .await?;
        if !status.success() {
            warn!("yt-dlp exited with {status} for query: {query}");
        }
        Ok(())
    }

    fn command_args(&self, query: &str, out_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            AUDIO_FORMAT.into(),
            "--audio-quality".into(),
            AUDIO_QUALITY.into(),
            "--output".into(),
            out_dir.join("%(title)s.%(ext)s").into(),
        ];
        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.into());
        }
        args.push(format!("ytsearch1:{query}").into());
        args
    }
}

/// The free-text query a row turns into: `"{name} {artists} audio"`.
#[must_use]
pub fn search_query(name: &str, artists: &str) -> String {
    let mut parts = vec![name];
    if !artists.is_empty() {
        parts.push(artists);
    }
    parts.push("audio");
    parts.join(" ")
}
