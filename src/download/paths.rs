use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, FixedOffset};

use crate::library::MediaItem;

/// Appended to the base path to form the metadata sidecar name.
pub const METADATA_SUFFIX: &str = ".json";

/// Number of trailing id characters that disambiguate items from the same day.
const ID_SUFFIX_LEN: usize = 8;

/// Where one item lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPaths {
    pub metadata: PathBuf,
    pub payload: PathBuf,
}

/// Compute the sidecar and payload paths for `item` under `root`.
pub fn item_paths(root: &Path, item: &MediaItem) -> ItemPaths {
    let base = base_path(root, item);

    let mut metadata = OsString::from(base.as_os_str());
    metadata.push(METADATA_SUFFIX);

    let mut payload = base.into_os_string();
    if let Some(ext) = item.mime_type().and_then(extension_for_mime_type) {
        payload.push(ext);
    }

    ItemPaths {
        metadata: PathBuf::from(metadata),
        payload: PathBuf::from(payload),
    }
}

/// Extension-less path for `item`: chronological when the creation time
/// parses, hash-bucketed otherwise.
pub fn base_path(root: &Path, item: &MediaItem) -> PathBuf {
    match item.created() {
        Some(created) => path_by_date(root, &created, item.id()),
        None => path_by_hash(root, item.id()),
    }
}

/// `<root>/<year>/<MonthName>/<day>_<id suffix>`.
///
/// Year, month and day are taken in the offset the timestamp was reported
/// in, so a path never depends on the machine's local timezone.
pub fn path_by_date(root: &Path, created: &DateTime<FixedOffset>, id: &str) -> PathBuf {
    let leaf = format!("{}_{}", created.day(), id_suffix(id));
    root.join(created.year().to_string())
        .join(created.format("%B").to_string())
        .join(leaf)
}

/// `<root>/<md5[0..4]>/<md5[4..8]>/<md5[8..]>` of the item id.
pub fn path_by_hash(root: &Path, id: &str) -> PathBuf {
    let hex = format!("{:x}", md5::compute(id.as_bytes()));
    root.join(&hex[..4]).join(&hex[4..8]).join(&hex[8..])
}

/// Last `ID_SUFFIX_LEN` characters of `id`, or all of it when shorter.
fn id_suffix(id: &str) -> &str {
    match id.char_indices().rev().nth(ID_SUFFIX_LEN - 1) {
        Some((idx, _)) => &id[idx..],
        None => id,
    }
}

/// Mime types the library serves, mapped to the conventional extension.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/bmp", ".bmp"),
    ("image/tiff", ".tiff"),
    ("image/heic", ".heic"),
    ("image/heif", ".heif"),
    ("image/avif", ".avif"),
    ("image/x-icon", ".ico"),
    ("image/x-adobe-dng", ".dng"),
    ("image/x-canon-cr2", ".cr2"),
    ("image/x-canon-cr3", ".cr3"),
    ("image/x-nikon-nef", ".nef"),
    ("image/x-sony-arw", ".arw"),
    ("image/x-fuji-raf", ".raf"),
    ("image/x-olympus-orf", ".orf"),
    ("image/x-panasonic-rw2", ".rw2"),
    ("video/mp4", ".mp4"),
    ("video/quicktime", ".mov"),
    ("video/x-m4v", ".m4v"),
    ("video/3gpp", ".3gp"),
    ("video/3gpp2", ".3g2"),
    ("video/webm", ".webm"),
    ("video/mpeg", ".mpg"),
    ("video/mp2t", ".mts"),
    ("video/x-msvideo", ".avi"),
    ("video/x-ms-wmv", ".wmv"),
    ("video/x-matroska", ".mkv"),
    ("video/x-flv", ".flv"),
];

/// Best-effort extension (with leading dot) for a mime type. Parameters such
/// as `; charset=` are ignored and matching is case-insensitive.
pub fn extension_for_mime_type(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}
