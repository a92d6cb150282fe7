//! Local PDF text extraction via `lopdf`.
//!
//! The upload is already in memory, so the document is parsed straight from
//! the byte buffer with no temp file. Parsing is CPU-bound and runs inside
//! `spawn_blocking` to keep the async workers free.

use crate::error::ExtractionError;
use lopdf::Document;
use tracing::{debug, warn};

/// Extract the text layer of every page, in page order, with no separator
/// between pages.
///
/// A PDF with no text layer (e.g. a scan) yields `Ok("")`. A page whose
/// content stream cannot be decoded contributes nothing; the document as a
/// whole fails only if it cannot be loaded.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_pdf_text_blocking(&bytes))
        .await
        .map_err(|e| ExtractionError::PdfParse {
            detail: format!("extraction task panicked: {e}"),
        })?
}

/// Blocking implementation of [`extract_pdf_text`].
pub fn extract_pdf_text_blocking(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes).map_err(|e| ExtractionError::PdfParse {
        detail: e.to_string(),
    })?;

    let pages = document.get_pages();
    let mut text = String::new();

    // BTreeMap keys are 1-based page numbers, already in page order.
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => warn!("Page {}: no extractable text ({})", page_number, e),
        }
    }

    debug!("PDF: {} pages, {} bytes of text", pages.len(), text.len());
    Ok(text)
}
