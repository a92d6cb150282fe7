//! Error types for the recurio library.
//!
//! Three error types reflect three distinct failure scopes:
//!
//! * [`RecurioError`]: **Fatal**: the process cannot start serving (bad
//!   configuration, HTTP client construction failed, listen address taken).
//!   Never produced while a batch is being analysed.
//!
//! * [`ExtractionError`]: **Per file**: one upload could not be turned into
//!   text. Stored inside [`crate::output::ExtractedDocument`]; the remaining
//!   files of the batch are still processed. Each variant has a fixed
//!   [`sentinel`](ExtractionError::sentinel) that stands in for the text
//!   when the corpus is assembled.
//!
//! * [`CompletionError`]: **Per batch**: the chat-completion call failed.
//!   Rendered to a user-visible HTML fragment with
//!   [`to_html`](CompletionError::to_html) instead of the question list.

use thiserror::Error;

/// All fatal errors returned by the recurio library.
#[derive(Debug, Error)]
pub enum RecurioError {
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The outbound HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// The server could not bind its listen address.
    #[error("Failed to bind '{addr}': {source}")]
    ServerBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("HTTP server error: {0}")]
    Server(#[source] std::io::Error),
}

/// A non-fatal error for a single uploaded file.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize)]
pub enum ExtractionError {
    /// The filename suffix is not one of `.pdf`, `.png`, `.jpg`, `.jpeg`.
    #[error("unsupported file type '{extension}'")]
    UnsupportedFileType { extension: String },

    /// The bytes could not be parsed as a PDF document.
    #[error("PDF extraction failed: {detail}")]
    PdfParse { detail: String },

    /// The OCR service answered but reported a processing failure.
    #[error("OCR processing failed: {message}")]
    OcrProcessing { message: String },

    /// The OCR call itself failed: connection error, timeout, non-success
    /// status, malformed JSON or missing fields.
    #[error("OCR request failed: {detail}")]
    OcrTransport { detail: String },
}

impl ExtractionError {
    /// The fixed placeholder inserted into the corpus in place of text.
    pub fn sentinel(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedFileType { .. } => "[Unsupported file type]",
            ExtractionError::PdfParse { .. } => "[PDF Extraction Error]",
            ExtractionError::OcrProcessing { .. } => "[OCR Error]",
            ExtractionError::OcrTransport { .. } => "[OCR API Error]",
        }
    }
}

/// A non-fatal failure of the chat-completion call.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize)]
pub enum CompletionError {
    /// The API answered with a status other than 200.
    #[error("completion API returned HTTP {code}")]
    Status { code: u16, body: String },

    /// Connection error or timeout before a response arrived.
    #[error("completion request failed: {detail}")]
    Transport { detail: String },

    /// HTTP 200 but the body was not the expected JSON shape.
    #[error("malformed completion response: {detail}")]
    MalformedResponse { detail: String },
}

impl CompletionError {
    /// Render the fragment shown to the end user in place of the result.
    ///
    /// The upstream body is escaped; it is echoed for diagnosis only.
    pub fn to_html(&self) -> String {
        match self {
            CompletionError::Status { code, body } => {
                let mut html = format!("<p>Error from completion API: {code}</p>");
                if !body.trim().is_empty() {
                    html.push_str("<pre>");
                    html.push_str(&escape_html(body.trim()));
                    html.push_str("</pre>");
                }
                html
            }
            CompletionError::Transport { .. } | CompletionError::MalformedResponse { .. } => {
                "<p>Something went wrong while contacting the completion API.</p>".to_string()
            }
        }
    }
}

/// Failure of one outbound HTTP call before a response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The per-call deadline elapsed.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Connection, TLS, or request construction failure.
    #[error("{0}")]
    Request(String),
}

/// Minimal HTML escaping for text placed inside element content.
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
