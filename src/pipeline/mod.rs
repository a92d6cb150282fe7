//! Pipeline stages for question analysis.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ extract ──▶ aggregate ──▶ prompts ──▶ completion ──▶ postprocess
//!             ├─ pdf  (lopdf, local)
//!             └─ ocr  (remote)
//! ```
//!
//! 1. [`upload`]: the uploaded file, extension dispatch, filename sanitising
//! 2. [`extract`]: per-file dispatcher; never fails, returns a document
//!    carrying either text or an [`crate::error::ExtractionError`]
//!    * [`pdf`]: text layer of every page; runs in `spawn_blocking`
//!    * [`ocr`]: one multipart POST per image
//! 3. [`aggregate`]: `filename\ntext\n\n` blocks in upload order
//! 4. [`crate::prompts`]: fixed instruction suffix
//! 5. [`completion`]: one chat-completion POST, no retry
//! 6. [`postprocess`]: strip code fences and invisible characters from the reply

pub mod aggregate;
pub mod completion;
pub mod extract;
pub mod ocr;
pub mod pdf;
pub mod postprocess;
pub mod upload;
