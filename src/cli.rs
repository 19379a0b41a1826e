use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use rexporter::clients::SpotifyClient;
use rexporter::clients::errors::Result;
use rexporter::download::Downloader;
use rexporter::exporter::Exporter;
use rexporter::playlist_files;
use rexporter::retry::{Retrier, RetryPolicy};

#[derive(Parser)]
#[command(name = "rexporter")]
#[command(version, about = "Export Spotify playlists to CSV and fetch matching audio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the library and write one CSV per playlist
    Export {
        /// Directory the playlist CSVs are written to
        #[arg(long, default_value = "Playlists")]
        playlists_dir: PathBuf,
    },
    /// Read the exported CSVs and download matching audio with yt-dlp
    Download {
        /// Directory the playlist CSVs are read from
        #[arg(long, default_value = "Playlists")]
        playlists_dir: PathBuf,
        /// Directory the audio files are saved under, one folder per playlist
        #[arg(long, default_value = "Downloads")]
        downloads_dir: PathBuf,
        /// yt-dlp binary to invoke
        #[arg(long, default_value = "yt-dlp")]
        ytdlp_bin: PathBuf,
        /// Directory containing the ffmpeg binaries, if not on PATH
        #[arg(long)]
        ffmpeg_location: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export { playlists_dir } => export_library(&playlists_dir).await,
        Commands::Download {
            playlists_dir,
            downloads_dir,
            ytdlp_bin,
            ffmpeg_location,
        } => {
            let downloader = Downloader::new(ytdlp_bin, downloads_dir, ffmpeg_location);
            downloader.run(&playlists_dir).await
        }
    }
}

async fn export_library(playlists_dir: &Path) -> Result<()> {
    let client = SpotifyClient::try_default()?;
    info!("Authorizing Spotify client ...");
    // A CLI prompt may be shown on this call
    client.authorize_client().await?;

    let exporter = Exporter::new(client, Retrier::new(RetryPolicy::default()));
    let library = exporter.fetch_library().await;
    playlist_files::write_library(playlists_dir, &library)
}
