//! Photos library listing: paginated media search and album listing against
//! the Google Photos Library API. The download engine only sees the
//! [`MediaLibrary`] trait; [`PhotosLibraryClient`] is the HTTP implementation.

mod album;
pub mod client;
pub mod error;
mod item;

pub use album::Album;
pub use client::PhotosLibraryClient;
pub use error::LibraryError;
pub use item::MediaItem;

use serde::{Deserialize, Serialize};

/// Parameters for one `mediaItems:search` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<MediaItem>,
    /// Continuation cursor; `None` once the listing is exhausted.
    pub next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    media_items: Vec<MediaItem>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl From<SearchResponse> for SearchPage {
    fn from(resp: SearchResponse) -> Self {
        Self {
            items: resp.media_items,
            // The API signals the last page with an empty token as often as
            // with a missing one.
            next_page_token: resp.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

/// Read-only access to a remote media library.
#[async_trait::async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Fetch one page of media items. An empty `page_token` requests the
    /// first page.
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, LibraryError>;

    /// List every album visible to the account.
    async fn albums(&self) -> Result<Vec<Album>, LibraryError>;
}
