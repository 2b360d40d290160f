//! Download engine. Walks the library listing page by page and persists each
//! item sequentially. A run is a small state machine: throttle, fetch a page,
//! process its items, repeat until the cursor runs out or the item cap is hit.

pub mod content;
pub mod error;
pub mod file;
pub mod paths;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use content::ContentSource;
pub use stats::RunStats;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::library::{MediaItem, MediaLibrary, SearchRequest};

/// Settings consumed by the download engine, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub directory: PathBuf,
    /// Hard ceiling on items processed in one run.
    pub max_items: u64,
    pub page_size: u32,
    /// Delay before every page request, the first one included.
    pub throttle: Duration,
    pub album_id: Option<String>,
}

#[derive(Debug)]
enum RunPhase {
    Throttling,
    Listing,
    Processing(Vec<MediaItem>),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageEnd {
    Exhausted,
    CapReached,
}

/// Download every item the listing returns, up to `config.max_items`.
///
/// `stats` is reset on entry and updated as items are processed, so it still
/// holds the partial counts if a page fetch fails and the run aborts. Item
/// failures are counted and logged; only a listing failure is returned.
pub async fn download_all(
    library: &dyn MediaLibrary,
    source: &dyn ContentSource,
    config: &DownloadConfig,
    stats: &mut RunStats,
) -> Result<()> {
    let started = Instant::now();
    stats.reset();

    let mut request = SearchRequest {
        page_size: config.page_size,
        album_id: config.album_id.clone(),
        page_token: None,
    };
    let mut pages_fetched: u32 = 0;
    let mut phase = RunPhase::Throttling;

    loop {
        phase = match phase {
            RunPhase::Throttling => {
                tracing::info!("{}, Waiting {:?}", stats, config.throttle);
                tokio::time::sleep(config.throttle).await;
                RunPhase::Listing
            }
            RunPhase::Listing => {
                let page = library
                    .search(&request)
                    .await
                    .with_context(|| format!("Failed to list media items (page {})", pages_fetched + 1))?;
                pages_fetched += 1;
                tracing::debug!(
                    page = pages_fetched,
                    items = page.items.len(),
                    more = page.next_page_token.is_some(),
                    "Fetched listing page"
                );
                request.page_token = page.next_page_token;
                RunPhase::Processing(page.items)
            }
            RunPhase::Processing(items) => {
                let end = process_page(source, config, &items, stats).await;
                if end == PageEnd::Exhausted && request.page_token.is_some() {
                    RunPhase::Throttling
                } else {
                    RunPhase::Done
                }
            }
            RunPhase::Done => break,
        };
    }

    tracing::info!(
        pages = pages_fetched,
        "{}, Elapsed: {}",
        stats,
        stats::format_duration(started.elapsed())
    );
    Ok(())
}

async fn process_page(
    source: &dyn ContentSource,
    config: &DownloadConfig,
    items: &[MediaItem],
    stats: &mut RunStats,
) -> PageEnd {
    for item in items {
        stats.record_seen();
        if stats.total > config.max_items {
            tracing::info!(max_items = config.max_items, "Reached maximum item count");
            return PageEnd::CapReached;
        }

        match file::persist_item(source, &config.directory, item).await {
            Ok(outcome) => stats.record_outcome(outcome),
            Err(e) => {
                tracing::error!(id = %item.id(), "Failed to download {}: {}", item.id(), e);
                stats.record_error();
            }
        }
    }
    PageEnd::Exhausted
}
