//! photos-backup: mirrors a Google Photos library to local disk.
//!
//! Pages through the Photos Library API, writes a JSON sidecar for every media
//! item and streams the payload next to it. Re-runs skip payloads whose local
//! size already matches the remote one.

#![warn(clippy::all)]

mod cli;
mod config;
mod download;
mod library;
pub mod retry;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Command;
use config::{ApiConfig, Config};
use library::{MediaLibrary, PhotosLibraryClient};

fn library_client(http: reqwest::Client, api: &ApiConfig) -> PhotosLibraryClient {
    PhotosLibraryClient::new(http, api.api_url.as_str(), api.access_token.as_str(), api.retry)
}

/// Run the download command.
async fn run_download(args: cli::DownloadArgs) -> anyhow::Result<()> {
    let config = Config::from_cli(args)?;
    tracing::info!(
        directory = %config.download.directory.display(),
        album = config.download.album_id.as_deref().unwrap_or("<all>"),
        "Starting photos-backup"
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("photos-backup/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let library = library_client(http.clone(), &config.api);

    let mut stats = download::RunStats::default();
    download::download_all(&library, &http, &config.download, &mut stats).await
}

/// One `album <id>: <title>` line per album the account can see.
async fn album_lines(library: &dyn MediaLibrary) -> anyhow::Result<Vec<String>> {
    let albums = library.albums().await?;
    Ok(albums
        .iter()
        .map(|album| format!("album {}: {}", album.id, album))
        .collect())
}

/// Run the list-albums command.
async fn run_list_albums(args: cli::ApiArgs) -> anyhow::Result<()> {
    let api = ApiConfig::from_args(args)?;
    let library = library_client(reqwest::Client::new(), &api);

    let lines = album_lines(&library).await?;
    if lines.is_empty() {
        tracing::info!("No albums found");
    }
    for line in lines {
        tracing::info!("{}", line);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    match cli.command {
        Command::Download(args) => run_download(args).await,
        Command::ListAlbums(args) => run_list_albums(args).await,
    }
}
