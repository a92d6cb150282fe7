//! Outbound HTTP behind a trait.
//!
//! The OCR stage and the completion stage each make exactly one POST. Both
//! go through [`HttpTransport`] so the pipeline never names `reqwest`
//! directly: production code injects [`ReqwestTransport`], tests inject a
//! fake that returns canned replies and records what was sent.
//!
//! A transport only moves bytes. It reports *any* HTTP status as
//! `Ok(HttpReply)`; interpreting 4xx/5xx is the caller's business.
//! `Err(TransportError)` means no response was received at all.

use crate::error::{RecurioError, TransportError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// Status and body of a received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name carrying the file.
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A `multipart/form-data` body: plain text fields plus one file.
#[derive(Debug, Clone)]
pub struct MultipartRequest {
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

impl MultipartRequest {
    /// Look up a text field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One-shot HTTP POSTs used by the pipeline.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a multipart form.
    async fn post_multipart(
        &self,
        url: &str,
        request: MultipartRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;

    /// POST a JSON body with an `Authorization: Bearer` header.
    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, RecurioError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("recurio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RecurioError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an already-configured client (proxies, custom roots, …).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let response = builder
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(e, timeout))?;
        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(HttpReply { status, body })
    }
}

fn classify(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            secs: timeout.as_secs(),
        }
    } else {
        TransportError::Request(e.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_multipart(
        &self,
        url: &str,
        request: MultipartRequest,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let MultipartRequest { fields, file } = request;
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)
            .map_err(|e| TransportError::Request(format!("invalid content type: {e}")))?;

        let mut form = Form::new().part(file.field, part);
        for (name, value) in fields {
            form = form.text(name, value);
        }

        self.send(self.client.post(url).multipart(form), timeout)
            .await
    }

    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let builder = self.client.post(url).bearer_auth(bearer_token).json(body);
        self.send(builder, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_field_lookup() {
        let req = MultipartRequest {
            fields: vec![
                ("apikey".into(), "k".into()),
                ("language".into(), "eng".into()),
            ],
            file: FilePart {
                field: "file".into(),
                filename: "scan.png".into(),
                content_type: "image/png".into(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
        };
        assert_eq!(req.field("language"), Some("eng"));
        assert_eq!(req.field("OCREngine"), None);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::new().expect("client");
        // Port 9 on localhost (discard) is closed on any sane test machine.
        let result = transport
            .post_json(
                "http://127.0.0.1:9/v1/chat/completions",
                "k",
                &serde_json::json!({}),
                Duration::from_secs(2),
            )
            .await;
        assert!(result.is_err());
    }
}
