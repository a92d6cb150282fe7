//! Per-file dispatcher: choose the extraction path from the filename.

use crate::config::AnalysisConfig;
use crate::error::ExtractionError;
use crate::output::ExtractedDocument;
use crate::pipeline::upload::{sanitize_filename, FileKind, UploadedFile};
use crate::pipeline::{ocr, pdf};
use crate::transport::HttpTransport;
use std::time::Instant;
use tracing::{info, warn};

/// Turn one upload into an [`ExtractedDocument`].
///
/// * `.pdf` → local text layer, no network.
/// * `.png` / `.jpg` / `.jpeg` → one OCR call.
/// * anything else → `UnsupportedFileType`, no network.
///
/// Always returns a document, never an error: one bad file must not abort
/// the rest of the batch.
pub async fn extract(
    transport: &dyn HttpTransport,
    file: &UploadedFile,
    config: &AnalysisConfig,
) -> ExtractedDocument {
    let start = Instant::now();
    let filename = if config.sanitize_filenames {
        sanitize_filename(&file.filename)
    } else {
        file.filename.clone()
    };

    let outcome = match FileKind::from_filename(&filename) {
        FileKind::Pdf => pdf::extract_pdf_text(file.bytes.clone()).await,
        FileKind::Image => ocr::ocr_image(transport, file, &filename, config).await,
        FileKind::Unsupported(extension) => {
            Err(ExtractionError::UnsupportedFileType { extension })
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    match &outcome {
        Ok(text) => info!("'{}': {} bytes of text in {}ms", filename, text.len(), duration_ms),
        Err(e) => warn!("'{}': {}", filename, e),
    }

    ExtractedDocument {
        filename,
        outcome,
        duration_ms,
    }
}
