use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::HumanBytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::content::{ContentSource, RemoteContent};
use super::error::DownloadError;
use super::paths;
use crate::library::MediaItem;

/// Result of a successful [`persist_item`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The payload was (re)written with this many bytes.
    Downloaded { bytes: u64 },
    /// A payload of the declared size was already on disk.
    AlreadyDownloaded,
}

/// Write `item`'s metadata sidecar and payload under `root`.
///
/// The sidecar is written once and never replaced. The payload is skipped when
/// the file on disk matches the declared content length, and rewritten from
/// scratch otherwise.
pub async fn persist_item(
    source: &dyn ContentSource,
    root: &Path,
    item: &MediaItem,
) -> Result<PersistOutcome, DownloadError> {
    let paths = paths::item_paths(root, item);

    write_metadata(item, &paths.metadata).await?;

    let url = item
        .download_url()
        .ok_or_else(|| DownloadError::MissingContentUrl(item.id().to_string()))?;
    let content = source.fetch(&url).await?;

    write_payload(content, &paths.payload).await
}

/// Create the sidecar if it is absent. Returns whether it was written.
///
/// Goes through a `.part` file and a rename so an interrupted write can never
/// leave a truncated sidecar that would then be kept forever.
async fn write_metadata(item: &MediaItem, path: &Path) -> Result<bool, DownloadError> {
    if fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Metadata already present");
        return Ok(false);
    }

    tracing::info!(path = %path.display(), "Creating metadata");
    let bytes = item.to_json_bytes().map_err(|source| DownloadError::Serialize {
        id: item.id().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        create_dirs(parent).await?;
    }
    let part = part_path(path);
    let mut file = open_truncated(&part).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    drop(file);
    fs::rename(&part, path).await?;

    Ok(true)
}

async fn write_payload(content: RemoteContent, path: &Path) -> Result<PersistOutcome, DownloadError> {
    let declared = content.content_length;

    match fs::metadata(path).await {
        Ok(meta) => {
            if declared == Some(meta.len()) {
                tracing::info!(path = %path.display(), "File already downloaded");
                return Ok(PersistOutcome::AlreadyDownloaded);
            }
            tracing::info!(
                path = %path.display(),
                on_disk = meta.len(),
                remote = ?declared,
                "File size has changed, re-downloading"
            );
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "File not yet downloaded");
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "Cannot inspect existing file, check permissions: {}",
                e
            );
            return Err(e.into());
        }
    }

    if let Some(parent) = path.parent() {
        create_dirs(parent).await?;
    }

    let mut file = open_truncated(path).await?;
    let mut body = content.body;
    let mut bytes_written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await?;

    if let Some(expected) = declared {
        if bytes_written != expected {
            return Err(DownloadError::Truncated {
                path: path.display().to_string(),
                expected,
                bytes_written,
            });
        }
    }

    tracing::info!(
        "Downloaded '{}' ({})",
        path.display(),
        HumanBytes(bytes_written)
    );
    Ok(PersistOutcome::Downloaded {
        bytes: bytes_written,
    })
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Create `dir` and its parents, owner-only on Unix.
async fn create_dirs(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder.create(dir).await
}

/// Open for writing, creating or truncating; 0644 on Unix.
async fn open_truncated(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);
    options.open(path).await
}
