use thiserror::Error;

/// Per-item persistence failures. None of these abort a run; the driver logs
/// them against the item and moves on.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP error fetching {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Transfer of {path} interrupted after {bytes_written} of {expected} bytes")]
    Truncated {
        path: String,
        expected: u64,
        bytes_written: u64,
    },

    #[error("Item {0} has no content URL")]
    MissingContentUrl(String),

    #[error("Failed to serialize metadata for {id}: {source}")]
    Serialize {
        id: String,
        source: serde_json::Error,
    },

    #[error("Disk error: {0}")]
    Disk(#[from] std::io::Error),
}
