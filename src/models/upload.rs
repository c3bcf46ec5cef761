//! Transient upload types and the on-disk names derived from them.

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

/// Prefix that turns an original's stored name into its thumbnail's name.
pub const THUMBNAIL_PREFIX: &str = "min_";

/// A file received from a client, held in memory for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied filename; only its extension is used.
    pub filename: String,
    pub content: Bytes,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// An original and its thumbnail as written to the files directory.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoredImage {
    /// Generated identifier, the filename stem of both files.
    pub id: Uuid,

    /// `<id><ext>`
    pub original: String,

    /// `min_<id><ext>`
    pub thumbnail: String,
}

impl StoredImage {
    /// Derive both stored names from a fresh identifier and the uploaded filename.
    pub fn for_upload(id: Uuid, uploaded_filename: &str) -> Self {
        let original = format!("{}{}", id, extension_of(uploaded_filename));
        let thumbnail = thumbnail_name(&original);
        Self {
            id,
            original,
            thumbnail,
        }
    }
}

pub fn thumbnail_name(original: &str) -> String {
    format!("{}{}", THUMBNAIL_PREFIX, original)
}

/// Extension of the final path component: everything from its last dot,
/// dot included. Empty when there is no dot or the dot is the final character,
/// so `.png` yields `.png` and `a.` yields nothing.
///
/// Both separators are honoured so a Windows-style client path cannot smuggle
/// a directory into the stored name.
pub fn extension_of(filename: &str) -> String {
    let last = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match last.rfind('.') {
        Some(dot) if dot + 1 < last.len() => last[dot..].to_string(),
        _ => String::new(),
    }
}
