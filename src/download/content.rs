//! Content transport. Fetches an item's binary payload as a byte stream.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::error::DownloadError;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DownloadError>> + Send>>;

/// An open response body. Dropping it closes the underlying connection.
pub struct RemoteContent {
    /// Length declared by the server, if any.
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

impl std::fmt::Debug for RemoteContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteContent")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RemoteContent, DownloadError>;
}

#[async_trait::async_trait]
impl ContentSource for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<RemoteContent, DownloadError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::Http {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let content_length = response.content_length();
        let url = url.to_string();
        let body = response.bytes_stream().map(move |chunk| {
            chunk.map_err(|source| DownloadError::Http {
                url: url.clone(),
                source,
            })
        });

        Ok(RemoteContent {
            content_length,
            body: Box::pin(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_streams_body_with_length() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lr/abc=d"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 2048]))
            .mount(&server)
            .await;

        let url = format!("{}/lr/abc=d", server.uri());
        let content = reqwest::Client::new().fetch(&url).await.unwrap();
        assert_eq!(content.content_length, Some(2048));

        let chunks: Vec<Bytes> = content
            .body
            .map(|c| c.unwrap())
            .collect()
            .await;
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(total, 2048);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let url = format!("{}/lr/gone=d", server.uri());
        let err = reqwest::Client::new().fetch(&url).await.unwrap_err();
        assert!(matches!(err, DownloadError::HttpStatus { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let err = reqwest::Client::new()
            .fetch("http://127.0.0.1:1/nothing=d")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Http { .. }));
    }
}
