use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{ApiArgs, DownloadArgs};
use crate::download::DownloadConfig;
use crate::retry::RetryConfig;

/// Largest page the `mediaItems:search` endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Connection settings for the Photos Library API.
pub struct ApiConfig {
    pub access_token: String,
    pub api_url: String,
    pub retry: RetryConfig,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("access_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_args(args: ApiArgs) -> anyhow::Result<Self> {
        let access_token = args.access_token.trim().to_string();
        if access_token.is_empty() {
            anyhow::bail!("--access-token (or PHOTOS_ACCESS_TOKEN) must not be empty");
        }
        Ok(Self {
            access_token,
            api_url: args.api_url,
            retry: RetryConfig {
                max_retries: args.max_retries,
                base_delay: Duration::from_secs(args.retry_delay),
                max_delay: MAX_RETRY_DELAY.max(Duration::from_secs(args.retry_delay)),
            },
        })
    }
}

/// Validated configuration for a download run.
#[derive(Debug)]
pub struct Config {
    pub api: ApiConfig,
    pub download: DownloadConfig,
}

impl Config {
    pub fn from_cli(args: DownloadArgs) -> anyhow::Result<Self> {
        if args.directory.trim().is_empty() {
            anyhow::bail!("--directory must not be empty");
        }
        if !(1..=MAX_PAGE_SIZE).contains(&args.page_size) {
            anyhow::bail!(
                "--page-size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                args.page_size
            );
        }

        let download = DownloadConfig {
            directory: expand_tilde(&args.directory),
            max_items: args.max_items.unwrap_or(u64::MAX),
            page_size: args.page_size,
            throttle: Duration::from_secs(args.throttle),
            album_id: args.album_id.filter(|a| !a.is_empty()),
        };

        Ok(Self {
            api: ApiConfig::from_args(args.api)?,
            download,
        })
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
