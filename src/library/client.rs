use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::LibraryError;
use super::{Album, MediaLibrary, SearchPage, SearchRequest, SearchResponse};
use crate::retry::{self, RetryAction, RetryConfig};

pub const DEFAULT_API_URL: &str = "https://photoslibrary.googleapis.com";

/// Maximum page size the albums endpoint accepts.
const ALBUM_PAGE_SIZE: u32 = 50;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumsResponse {
    #[serde(default)]
    albums: Vec<Album>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// HTTP client for the Photos Library API, authorized with a pre-issued
/// OAuth bearer token.
pub struct PhotosLibraryClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for PhotosLibraryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotosLibraryClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl PhotosLibraryClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        retry: RetryConfig,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            access_token: access_token.into(),
            retry,
        }
    }

    /// Send a request built by `build`, retrying transient failures, and
    /// decode the JSON body.
    async fn execute<T, B>(&self, endpoint: &str, build: B) -> Result<T, LibraryError>
    where
        T: DeserializeOwned,
        B: Fn() -> reqwest::RequestBuilder,
    {
        retry::retry_with_backoff(
            &self.retry,
            endpoint,
            |e: &LibraryError| {
                if e.is_retryable() {
                    RetryAction::Retry
                } else {
                    RetryAction::Abort
                }
            },
            || async {
                let response = build()
                    .bearer_auth(&self.access_token)
                    .send()
                    .await
                    .map_err(|source| LibraryError::Http {
                        endpoint: endpoint.to_string(),
                        source,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(LibraryError::HttpStatus {
                        status: status.as_u16(),
                        endpoint: endpoint.to_string(),
                        body,
                    });
                }

                let bytes = response.bytes().await.map_err(|source| LibraryError::Http {
                    endpoint: endpoint.to_string(),
                    source,
                })?;
                serde_json::from_slice(&bytes).map_err(|source| LibraryError::Decode {
                    endpoint: endpoint.to_string(),
                    source,
                })
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl MediaLibrary for PhotosLibraryClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, LibraryError> {
        let url = format!("{}/v1/mediaItems:search", self.base_url);
        debug!(
            page_size = request.page_size,
            album = request.album_id.as_deref().unwrap_or("-"),
            has_token = request.page_token.is_some(),
            "POST {}",
            url
        );
        let response: SearchResponse = self
            .execute("mediaItems:search", || self.http.post(&url).json(request))
            .await?;
        Ok(response.into())
    }

    async fn albums(&self) -> Result<Vec<Album>, LibraryError> {
        let url = format!("{}/v1/albums", self.base_url);
        let mut albums = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let response: AlbumsResponse = self
                .execute("albums", || {
                    let mut req = self
                        .http
                        .get(&url)
                        .query(&[("pageSize", ALBUM_PAGE_SIZE.to_string())]);
                    if let Some(token) = &page_token {
                        req = req.query(&[("pageToken", token)]);
                    }
                    req
                })
                .await?;

            debug!("Album listing page: {} albums", response.albums.len());
            albums.extend(response.albums);

            match response.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(albums)
    }
}
