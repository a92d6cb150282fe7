//! # recurio
//!
//! Find the questions that keep coming back across a pile of past exam
//! papers. Upload PDFs and photos of papers; recurio pulls the text out of
//! each, hands the lot to a chat model in one prompt, and renders the
//! model's list of repeated and similar questions.
//!
//! ## Pipeline Overview
//!
//! ```text
//! uploads
//!  │
//!  ├─ 1. Extract    .pdf → text layer (lopdf)   .png/.jpg/.jpeg → OCR API
//!  ├─ 2. Aggregate  "filename\ntext\n\n" per file, upload order
//!  ├─ 3. Prompt     corpus + fixed instruction (ordered HTML list only)
//!  ├─ 4. Complete   one chat-completion call, no retry
//!  └─ 5. Render     reply (or error fragment) inserted into the page
//! ```
//!
//! A file that cannot be read never aborts the batch: its text is replaced
//! by a short sentinel such as `[OCR Error]`. A failed completion call is
//! shown to the user as an HTML error fragment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recurio::{AnalysisConfig, Analyzer, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // OCR_API_KEY / OPENROUTER_API_KEY
//!     let analyzer = Analyzer::new(AnalysisConfig::from_env())?;
//!     let bytes = std::fs::read("dbms-2022.pdf")?;
//!     let files = vec![UploadedFile::new("dbms-2022.pdf", "application/pdf", bytes)];
//!     let output = analyzer.analyze(&files).await;
//!     println!("{}", output.html());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `recurio` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::Analyzer;
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ServerConfig};
pub use error::{CompletionError, ExtractionError, RecurioError, TransportError};
pub use output::{AnalysisOutput, AnalysisStats, ExtractedDocument};
pub use pipeline::upload::{FileKind, UploadedFile};
pub use prompts::{build_prompt, PromptVariant};
pub use transport::{HttpReply, HttpTransport, MultipartRequest, ReqwestTransport};
