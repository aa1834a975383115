mod commands;

use clap::Parser;
use commands::{
    execute_command,
    utils::{create_client, get_credentials, init_logging},
    Commands,
};

/// Export Spotify track metadata and artist genres to CSV
#[derive(Parser)]
#[command(
    name = "spotify-extract",
    about = "Export Spotify track metadata and artist genres to CSV",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    init_logging(args.verbose);

    // Get credentials from environment
    let credentials = match get_credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            eprintln!();
            eprintln!("Please set the following environment variables:");
            eprintln!("  SPOTIFY_CLIENT_ID=your_app_client_id");
            eprintln!("  SPOTIFY_CLIENT_SECRET=your_app_client_secret");
            eprintln!();
            eprintln!("Create an app at https://developer.spotify.com/dashboard to get them.");
            std::process::exit(1);
        }
    };

    let client = create_client(credentials, args.command.args().market.clone());

    // Per-reference failures are reported but never fail the run
    if let Err(e) = execute_command(args.command, &client).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
