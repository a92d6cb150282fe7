//! Uploaded files and extension-based dispatch.

use once_cell::sync::Lazy;
use regex::Regex;

/// One file as received from the form (or read from disk by the CLI).
///
/// Owned by the caller for the duration of a batch; stages only borrow it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as supplied by the client.
    pub filename: String,
    /// Declared MIME type, passed through to the OCR service.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Which extraction path a file takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// `.pdf`: local text-layer extraction.
    Pdf,
    /// `.png`, `.jpg`, `.jpeg`: remote OCR.
    Image,
    /// Anything else. Carries the lower-cased suffix (empty if none).
    Unsupported(String),
}

impl FileKind {
    /// Dispatch on the lower-cased filename suffix.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            FileKind::Image
        } else {
            let extension = match lower.rsplit_once('.') {
                Some((_, ext)) if !ext.contains('/') && !ext.contains('\\') => ext.to_string(),
                _ => String::new(),
            };
            FileKind::Unsupported(extension)
        }
    }
}

static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped and runs of characters outside
/// `[A-Za-z0-9._-]` become a single `_`. Leading dots are stripped only
/// while a `stem.ext` remains, so the suffix [`FileKind`] dispatches on is
/// never altered. A name with no letters or digits left becomes `upload`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let replaced = RE_UNSAFE.replace_all(base, "_");

    let stripped = replaced.trim_start_matches('.');
    let cleaned = if stripped.contains('.') {
        stripped
    } else {
        &*replaced
    };

    if cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
        cleaned.to_string()
    } else {
        "upload".to_string()
    }
}

/// Best-effort MIME type from the filename, for files read from disk.
pub fn guess_content_type(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}
