//! Batch entry point: extract every upload, build one prompt, ask the model.
//!
//! The [`Analyzer`] is built once at start-up and shared by every request.
//! It holds only read-only state (configuration and the transport), so
//! concurrent requests each run an independent pipeline with no locking.

use crate::config::AnalysisConfig;
use crate::error::RecurioError;
use crate::output::{AnalysisOutput, AnalysisStats, ExtractedDocument};
use crate::pipeline::upload::UploadedFile;
use crate::pipeline::{aggregate, completion, extract, postprocess};
use crate::prompts::build_prompt;
use crate::transport::{HttpTransport, ReqwestTransport};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runs the extraction → prompt → completion pipeline.
#[derive(Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("transport", &"<dyn HttpTransport>")
            .finish()
    }
}

impl Analyzer {
    /// Analyzer using the real network.
    pub fn new(config: AnalysisConfig) -> Result<Self, RecurioError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Analyzer using an injected transport.
    pub fn with_transport(config: AnalysisConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Extract all files, in upload order.
    ///
    /// With `extract_concurrency == 1` files are handled strictly one after
    /// another; larger values overlap them but the output order is unchanged.
    pub async fn extract_all(&self, files: &[UploadedFile]) -> Vec<ExtractedDocument> {
        let transport = self.transport.as_ref();
        let config = &self.config;

        if config.extract_concurrency <= 1 {
            let mut documents = Vec::with_capacity(files.len());
            for file in files {
                documents.push(extract::extract(transport, file, config).await);
            }
            return documents;
        }

        // Materialised up front: a borrowing `Map` adapter here leaves the
        // future failing axum's higher-ranked `Handler` bounds.
        let pending: Vec<_> = files
            .iter()
            .map(|file| extract::extract(transport, file, config))
            .collect();
        stream::iter(pending)
            .buffered(config.extract_concurrency)
            .collect()
            .await
    }

    /// Run the whole pipeline on one batch.
    ///
    /// Never fails: extraction failures become sentinels in the corpus and a
    /// completion failure is carried in [`AnalysisOutput::result`].
    pub async fn analyze(&self, files: &[UploadedFile]) -> AnalysisOutput {
        info!("Analysing {} file(s)", files.len());

        // ── Step 1: Extract ──────────────────────────────────────────────
        let extract_start = Instant::now();
        let documents = self.extract_all(files).await;
        let extraction_ms = extract_start.elapsed().as_millis() as u64;

        // ── Step 2: Aggregate ────────────────────────────────────────────
        let corpus = aggregate::aggregate(
            documents
                .iter()
                .map(|d| (d.filename.as_str(), d.corpus_text())),
        );

        // ── Step 3: Build prompt ─────────────────────────────────────────
        let prompt = build_prompt(&corpus, self.config.prompt_variant);

        // ── Step 4: Complete ─────────────────────────────────────────────
        let completion_start = Instant::now();
        let result = completion::complete(self.transport.as_ref(), &prompt, &self.config)
            .await
            .map(|reply| postprocess::clean_reply(&reply));
        let completion_ms = completion_start.elapsed().as_millis() as u64;

        let extracted = documents.iter().filter(|d| d.is_ok()).count();
        let stats = AnalysisStats {
            files: documents.len(),
            extracted,
            failed: documents.len() - extracted,
            corpus_bytes: corpus.len(),
            extraction_ms,
            completion_ms,
        };

        info!(
            "Batch done: {}/{} files extracted, completion {}, {}ms total",
            stats.extracted,
            stats.files,
            if result.is_ok() { "ok" } else { "failed" },
            extraction_ms + completion_ms
        );

        AnalysisOutput {
            documents,
            corpus,
            prompt,
            result,
            stats,
        }
    }
}
