use clap::{Args, Parser, Subcommand};

use crate::library::client::DEFAULT_API_URL;
use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "photos-backup",
    version,
    about = "Back up a Google Photos library to local disk"
)]
pub struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download media items and their metadata
    Download(DownloadArgs),
    /// List albums visible to the account
    ListAlbums(ApiArgs),
}

/// Options for talking to the Photos Library API.
#[derive(Args, Clone)]
pub struct ApiArgs {
    /// OAuth access token with the photoslibrary.readonly scope.
    /// Prefer the PHOTOS_ACCESS_TOKEN environment variable over the flag,
    /// which is visible in process listings.
    #[arg(long, env = "PHOTOS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Base URL of the Photos Library API
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Retries for a failed listing request
    #[arg(long, default_value_t = 2)]
    pub max_retries: u32,

    /// Base delay in seconds between listing retries
    #[arg(long, default_value_t = 5)]
    pub retry_delay: u64,
}

impl std::fmt::Debug for ApiArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiArgs")
            .field("access_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Backup folder
    #[arg(short = 'd', long)]
    pub directory: String,

    /// Stop after this many items (default: no limit)
    #[arg(long)]
    pub max_items: Option<u64>,

    /// Items requested per listing call (1-100)
    #[arg(long, default_value_t = 50)]
    pub page_size: u32,

    /// Seconds to wait before each listing call
    #[arg(long, default_value_t = 5)]
    pub throttle: u64,

    /// Only download items from this album id
    #[arg(short = 'a', long = "album")]
    pub album_id: Option<String>,
}
