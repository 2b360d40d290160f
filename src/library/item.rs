use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One remote media item, kept as the raw JSON object the API returned so
/// that the metadata sidecar preserves every field verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaItem {
    raw: Value,
}

impl MediaItem {
    #[cfg(test)]
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The opaque item identifier.
    pub fn id(&self) -> &str {
        self.raw["id"].as_str().unwrap_or_else(|| {
            tracing::warn!("Missing expected field: id");
            ""
        })
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.raw["mimeType"].as_str()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.raw["baseUrl"].as_str().filter(|u| !u.is_empty())
    }

    /// Raw `mediaMetadata.creationTime` string, if the API sent one.
    pub fn creation_time(&self) -> Option<&str> {
        self.raw["mediaMetadata"]["creationTime"].as_str()
    }

    /// Creation time parsed as RFC 3339, keeping the offset the API reported.
    /// `None` when the field is absent or malformed.
    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.creation_time()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt),
            Err(e) => {
                tracing::debug!(id = %self.id(), creation_time = raw, "Unparsable creation time: {}", e);
                None
            }
        }
    }

    pub fn is_video(&self) -> bool {
        !self.raw["mediaMetadata"]["video"].is_null()
    }

    /// URL of the full-resolution content.
    ///
    /// The plain `=d` suffix strips video processing, so video items need
    /// `=dv` to get the actual movie bytes.
    pub fn download_url(&self) -> Option<String> {
        let base = self.base_url()?;
        let suffix = if self.is_video() { "=dv" } else { "=d" };
        Some(format!("{}{}", base, suffix))
    }

    /// Serialize the full item as written to the metadata sidecar.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.raw)
    }
}
