//! HTTP request handlers.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::page::{render_error_page, render_page};
use crate::analyze::Analyzer;
use crate::pipeline::upload::UploadedFile;

/// Form field carrying the uploads.
pub const FILES_FIELD: &str = "files";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Empty upload form.
pub async fn index() -> Html<String> {
    Html(render_page(None))
}

/// Analyse the submitted files and render the result.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            warn!("Rejected upload: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Html(render_error_page(&rejection.body_text())),
            )
                .into_response();
        }
    };

    let files = match read_uploads(multipart).await {
        Ok(files) => files,
        Err((status, message)) => {
            warn!("Failed to read upload: {}", message);
            return (status, Html(render_error_page(&message))).into_response();
        }
    };

    if files.is_empty() {
        debug!("POST without files; rendering empty form");
        return Html(render_page(None)).into_response();
    }

    info!("Received {} file(s)", files.len());
    let output = state.analyzer.analyze(&files).await;
    Html(render_page(Some(&output.html()))).into_response()
}

/// Collect every non-empty `files` field, in submission order.
///
/// Browsers submit an empty part with an empty filename when nothing was
/// selected; such parts are skipped.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<UploadedFile>, (StatusCode, String)> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| (e.status(), e.body_text()))?;

        if filename.is_empty() && bytes.is_empty() {
            continue;
        }
        debug!("Upload '{}' ({}, {} bytes)", filename, content_type, bytes.len());
        files.push(UploadedFile::new(filename, content_type, bytes.to_vec()));
    }

    Ok(files)
}
