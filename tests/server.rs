//! HTTP surface tests: the router is driven in-process with `oneshot`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::FakeTransport;
use recurio::{AnalysisConfig, Analyzer};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "recurio-test-boundary";

fn config() -> recurio::AnalysisConfigBuilder {
    AnalysisConfig::builder().ocr_api_key("k").completion_api_key("sk")
}

fn app(transport: &Arc<FakeTransport>) -> axum::Router {
    app_with(transport, config().build().unwrap())
}

fn app_with(transport: &Arc<FakeTransport>, config: AnalysisConfig) -> axum::Router {
    recurio::server::app(Arc::new(Analyzer::with_transport(config, transport.clone())))
}

/// `(field, filename, content type, body)` parts as `multipart/form-data`.
fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_renders_empty_form() {
    let transport = Arc::new(FakeTransport::new());
    let response = app(&transport)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(r#"name="files""#));
    assert!(!page.contains(r#"<div class="RESPONSE">"#));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn health_is_ok() {
    let transport = Arc::new(FakeTransport::new());
    let response = app(&transport)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn post_renders_model_reply() {
    let transport = Arc::new(FakeTransport::new());
    let body = multipart_body(&[("files", "notes.txt", "text/plain", b"What is TCP?")]);

    let response = app(&transport).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(r#"<div class="RESPONSE"><ol><li>What is TCP?</li></ol></div>"#));
    assert!(transport.multipart_calls().is_empty());
    assert!(transport
        .sent_prompt()
        .starts_with("notes.txt\n[Unsupported file type]\n\n"));
}

#[tokio::test]
async fn post_keeps_submission_order() {
    let transport = Arc::new(FakeTransport::new());
    let body = multipart_body(&[
        ("files", "b.png", "image/png", &[2]),
        ("other", "ignored.png", "image/png", &[9]),
        ("files", "a.png", "image/png", &[1]),
    ]);

    let response = app(&transport).oneshot(upload(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sent: Vec<String> = transport
        .multipart_calls()
        .into_iter()
        .map(|r| r.file.filename)
        .collect();
    assert_eq!(sent, vec!["b.png", "a.png"]);
    assert!(transport
        .sent_prompt()
        .starts_with("b.png\ntext of b.png\n\na.png\ntext of a.png\n\n"));
}

#[tokio::test]
async fn post_without_files_renders_empty_form() {
    let transport = Arc::new(FakeTransport::new());
    let body = multipart_body(&[("files", "", "application/octet-stream", b"")]);

    let response = app(&transport).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(!page.contains(r#"<div class="RESPONSE">"#));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn non_multipart_post_is_rejected() {
    let transport = Arc::new(FakeTransport::new());
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("files=notes.txt"))
        .unwrap();

    let response = app(&transport).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn concurrent_extraction_through_router_keeps_order() {
    let transport = Arc::new(
        FakeTransport::new().ocr_delay("first.png", std::time::Duration::from_millis(100)),
    );
    let config = config().extract_concurrency(3).build().unwrap();
    let body = multipart_body(&[
        ("files", "first.png", "image/png", &[1]),
        ("files", "second.png", "image/png", &[2]),
        ("files", "third.txt", "text/plain", b"x"),
    ]);

    let response = app_with(&transport, config).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(r#"<div class="RESPONSE"><ol><li>What is TCP?</li></ol></div>"#));
    assert_eq!(
        transport.sent_prompt(),
        format!(
            "first.png\ntext of first.png\n\nsecond.png\ntext of second.png\n\n\
             third.txt\n[Unsupported file type]\n\n{}",
            recurio::prompts::COMMON_QUESTIONS_SUFFIX
        )
    );
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_analysis() {
    let transport = Arc::new(FakeTransport::new());
    let config = config().max_upload_bytes(1024).build().unwrap();
    let big = vec![b'x'; 4096];
    let body = multipart_body(&[("files", "big.pdf", "application/pdf", big.as_slice())]);

    let response = app_with(&transport, config).oneshot(upload(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let page = body_text(response).await;
    assert!(page.contains(r#"name="files""#));
    assert!(transport.calls().is_empty());
}
