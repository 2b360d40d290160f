//! In-memory stand-ins for the listing API and content transport.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;
use futures_util::stream;
use serde_json::json;

use super::content::{ContentSource, RemoteContent};
use super::error::DownloadError;
use crate::library::{Album, LibraryError, MediaItem, MediaLibrary, SearchPage, SearchRequest};

pub(crate) fn media_item(
    id: &str,
    creation_time: Option<&str>,
    mime_type: &str,
    base_url: &str,
    video: bool,
) -> MediaItem {
    let mut raw = json!({
        "id": id,
        "baseUrl": base_url,
        "mimeType": mime_type,
        "mediaMetadata": {"width": "10", "height": "10"}
    });
    if let Some(ct) = creation_time {
        raw["mediaMetadata"]["creationTime"] = json!(ct);
    }
    if video {
        raw["mediaMetadata"]["video"] = json!({"fps": 30.0, "status": "READY"});
    } else {
        raw["mediaMetadata"]["photo"] = json!({});
    }
    MediaItem::new(raw)
}

/// Serves fixed bodies by URL; unknown URLs answer 404.
pub(crate) struct FakeContent {
    bodies: HashMap<String, Vec<u8>>,
    declared_lengths: HashMap<String, Option<u64>>,
    requests: Mutex<Vec<String>>,
}

impl FakeContent {
    pub(crate) fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            declared_lengths: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    /// Override the Content-Length reported for `url`.
    pub(crate) fn with_declared_length(mut self, url: &str, len: Option<u64>) -> Self {
        self.declared_lengths.insert(url.to_string(), len);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ContentSource for FakeContent {
    async fn fetch(&self, url: &str) -> Result<RemoteContent, DownloadError> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| DownloadError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })?;
        let content_length = self
            .declared_lengths
            .get(url)
            .copied()
            .unwrap_or(Some(body.len() as u64));
        let chunks: Vec<Result<Bytes, DownloadError>> = body
            .chunks(4)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(RemoteContent {
            content_length,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

/// Replays a scripted sequence of search results and records every request.
/// Requests past the end of the script get an empty final page.
pub(crate) struct FakeLibrary {
    pages: Mutex<VecDeque<Result<SearchPage, LibraryError>>>,
    requests: Mutex<Vec<SearchRequest>>,
    albums: Vec<Album>,
}

impl FakeLibrary {
    pub(crate) fn new(pages: Vec<Result<SearchPage, LibraryError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
            albums: Vec::new(),
        }
    }

    pub(crate) fn with_albums(mut self, albums: Vec<Album>) -> Self {
        self.albums = albums;
        self
    }

    pub(crate) fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub(crate) fn page(items: Vec<MediaItem>, next: Option<&str>) -> Result<SearchPage, LibraryError> {
    Ok(SearchPage {
        items,
        next_page_token: next.map(str::to_string),
    })
}

pub(crate) fn listing_failure() -> Result<SearchPage, LibraryError> {
    Err(LibraryError::HttpStatus {
        status: 500,
        endpoint: "mediaItems:search".to_string(),
        body: "backend error".to_string(),
    })
}

#[async_trait::async_trait]
impl MediaLibrary for FakeLibrary {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, LibraryError> {
        self.requests.lock().unwrap().push(request.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::default()))
    }

    async fn albums(&self) -> Result<Vec<Album>, LibraryError> {
        Ok(self.albums.clone())
    }
}
