//! Remote OCR for image uploads (OCR.space-compatible API).
//!
//! ## Wire format
//!
//! Request: `multipart/form-data` with the image under `file` plus the text
//! fields `apikey`, `language` and `OCREngine`.
//!
//! Response (abridged):
//!
//! ```json
//! { "IsErroredOnProcessing": false,
//!   "ParsedResults": [ { "ParsedText": "Q1. What is TCP?\r\n" } ] }
//! ```
//!
//! `ErrorMessage` is a string or an array of strings depending on the
//! failure, so it is read as a raw JSON value.

use crate::config::AnalysisConfig;
use crate::error::ExtractionError;
use crate::pipeline::upload::UploadedFile;
use crate::transport::{FilePart, HttpTransport, MultipartRequest};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<serde_json::Value>,
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    parsed_text: Option<String>,
}

/// Build the multipart body for one image.
pub fn build_ocr_request(file: &UploadedFile, filename: &str, config: &AnalysisConfig) -> MultipartRequest {
    MultipartRequest {
        fields: vec![
            ("apikey".to_string(), config.ocr_api_key.clone()),
            ("language".to_string(), config.ocr_language.clone()),
            ("OCREngine".to_string(), config.ocr_engine.clone()),
        ],
        file: FilePart {
            field: "file".to_string(),
            filename: filename.to_string(),
            content_type: file.content_type.clone(),
            bytes: file.bytes.clone(),
        },
    }
}

/// Send one image to the OCR service and return the text of the first result.
///
/// Every failure is returned as an [`ExtractionError`]; nothing panics and
/// nothing is retried.
pub async fn ocr_image(
    transport: &dyn HttpTransport,
    file: &UploadedFile,
    filename: &str,
    config: &AnalysisConfig,
) -> Result<String, ExtractionError> {
    let request = build_ocr_request(file, filename, config);
    let timeout = Duration::from_secs(config.ocr_timeout_secs);

    let reply = transport
        .post_multipart(&config.ocr_endpoint, request, timeout)
        .await
        .map_err(|e| {
            warn!("OCR request for '{}' failed: {}", filename, e);
            ExtractionError::OcrTransport {
                detail: e.to_string(),
            }
        })?;

    debug!("OCR '{}': HTTP {}", filename, reply.status);
    parse_ocr_response(reply.status, &reply.body)
}

/// Interpret an OCR reply.
///
/// A processing failure reported in the body wins over the HTTP status;
/// otherwise a non-2xx status or a body without `ParsedResults[0].ParsedText`
/// is a transport failure.
pub fn parse_ocr_response(status: u16, body: &str) -> Result<String, ExtractionError> {
    let parsed: Result<OcrResponse, _> = serde_json::from_str(body);

    if let Ok(ref response) = parsed {
        if response.is_errored_on_processing {
            let message = response
                .error_message
                .as_ref()
                .map(error_message_text)
                .unwrap_or_else(|| "unknown OCR error".to_string());
            warn!("OCR service reported an error: {}", message);
            return Err(ExtractionError::OcrProcessing { message });
        }
    }

    if !(200..300).contains(&status) {
        return Err(ExtractionError::OcrTransport {
            detail: format!("HTTP {status}"),
        });
    }

    let response = parsed.map_err(|e| ExtractionError::OcrTransport {
        detail: format!("invalid JSON: {e}"),
    })?;

    response
        .parsed_results
        .and_then(|results| results.into_iter().next())
        .and_then(|first| first.parsed_text)
        .ok_or_else(|| ExtractionError::OcrTransport {
            detail: "response has no ParsedResults[0].ParsedText".to_string(),
        })
}

fn error_message_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
