pub mod export;
pub mod utils;

use clap::{Args, Subcommand};
use spotify_extract::reference::{DEFAULT_GENRES_OUTPUT, DEFAULT_TRACKS_OUTPUT};
use spotify_extract::{GenreProjection, SpotifyClient, TrackProjection};
use std::path::PathBuf;

/// Options shared by both exports
#[derive(Args, Clone, Debug)]
pub struct ExportArgs {
    /// File with one track URL per line (defaults to the built-in Trending Now Tamil list)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Output CSV file (overwritten if it exists)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Market to resolve tracks in (ISO 3166-1 alpha-2, e.g. IN).
    /// Needed for the is_playable and linked_from_id columns.
    #[arg(long)]
    pub market: Option<String>,

    /// Number of rows to preview on stderr (0 to disable)
    #[arg(long, default_value = "5")]
    pub preview: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export track metadata to CSV
    ///
    /// One row per track URL with id, position, name, primary artist, album,
    /// popularity, duration in minutes, explicit flag, release date, disc
    /// number, preview URL, playability and relinked track id.
    ///
    /// Usage examples:
    /// # Export the built-in playlist snapshot
    /// spotify-extract tracks
    ///
    /// # Export your own list, resolving playability for India
    /// spotify-extract tracks --input urls.txt --output tracks.csv --market IN
    Tracks(ExportArgs),

    /// Export the primary artist's genres to CSV
    ///
    /// One row per track URL with the track name, the primary artist's name
    /// and the artist's genre tags (N/A when the artist has none). This makes
    /// two lookups per URL.
    ///
    /// Usage examples:
    /// # Export genres for the built-in playlist snapshot
    /// spotify-extract genres
    ///
    /// # Export genres without printing a preview
    /// spotify-extract genres --input urls.txt --preview 0
    Genres(ExportArgs),
}

impl Commands {
    pub fn args(&self) -> &ExportArgs {
        match self {
            Commands::Tracks(args) | Commands::Genres(args) => args,
        }
    }
}

pub async fn execute_command(
    command: Commands,
    client: &SpotifyClient,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Tracks(args) => {
            export::handle_export(client, &TrackProjection, &args, DEFAULT_TRACKS_OUTPUT).await
        }
        Commands::Genres(args) => {
            export::handle_export(client, &GenreProjection, &args, DEFAULT_GENRES_OUTPUT).await
        }
    }
}
