use thiserror::Error;

/// Errors returned by the photos library listing API.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("API returned HTTP {status} for {endpoint}: {body}")]
    HttpStatus {
        status: u16,
        endpoint: String,
        body: String,
    },
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

impl LibraryError {
    /// Whether the failure is transient and the request worth repeating.
    ///
    /// Rate limiting (429) and server errors are retried; client errors such
    /// as an expired token (401) or a bad album id (400/404) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LibraryError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            LibraryError::Http { .. } => true,
            LibraryError::Decode { .. } => false,
        }
    }
}
