//! Rexporter - Export a Spotify library to per-playlist CSV files
//!
//! This library walks a user's Spotify library (liked songs plus every
//! playlist) page by page, writes one CSV per playlist, and can then feed
//! those CSVs to yt-dlp to fetch matching audio.

/// Client modules for interacting with external services
pub mod clients;
/// yt-dlp download stage driven by exported CSV files
pub mod download;
/// Library harvesting orchestration
pub mod exporter;
/// Cursor-following page walker
pub mod pager;
/// Per-playlist CSV writing and reading
pub mod playlist_files;
/// Bounded retry with transient/terminal error classification
pub mod retry;
/// Filesystem-safe playlist names
pub mod sanitize;
