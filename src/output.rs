//! Result types produced by [`crate::analyze::Analyzer`].

use crate::error::{CompletionError, ExtractionError};
use serde::Serialize;

/// Text extracted from one upload, or why there is none.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    /// Filename as used in the corpus (sanitised when enabled).
    pub filename: String,
    pub outcome: Result<String, ExtractionError>,
    pub duration_ms: u64,
}

impl ExtractedDocument {
    /// The text that goes into the corpus: the extracted text, or the
    /// failure's sentinel.
    pub fn corpus_text(&self) -> &str {
        match &self.outcome {
            Ok(text) => text,
            Err(e) => e.sentinel(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Counters and timings for one batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisStats {
    pub files: usize,
    pub extracted: usize,
    pub failed: usize,
    pub corpus_bytes: usize,
    pub extraction_ms: u64,
    pub completion_ms: u64,
}

/// Everything one batch produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    /// Per-file results in upload order.
    pub documents: Vec<ExtractedDocument>,
    pub corpus: String,
    pub prompt: String,
    /// The cleaned model reply, or why there is none.
    pub result: Result<String, CompletionError>,
    pub stats: AnalysisStats,
}

impl AnalysisOutput {
    /// The single HTML string handed to the page: the question list on
    /// success, an error fragment otherwise. Inserted unescaped.
    pub fn html(&self) -> String {
        match &self.result {
            Ok(text) => text.clone(),
            Err(e) => e.to_html(),
        }
    }
}
