//! Shared test helpers: a recording fake transport and in-memory PDFs.

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use recurio::{HttpReply, HttpTransport, MultipartRequest, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// One request seen by [`FakeTransport`].
#[derive(Debug, Clone)]
pub enum Call {
    Multipart {
        url: String,
        request: MultipartRequest,
    },
    Json {
        url: String,
        bearer: String,
        body: serde_json::Value,
    },
}

/// Canned replies keyed by uploaded filename (OCR) plus one completion reply.
pub struct FakeTransport {
    ocr_replies: HashMap<String, Result<HttpReply, TransportError>>,
    ocr_delays: HashMap<String, Duration>,
    completion_reply: Result<HttpReply, TransportError>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            ocr_replies: HashMap::new(),
            ocr_delays: HashMap::new(),
            completion_reply: Ok(completion_ok("<ol><li>What is TCP?</li></ol>")),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ocr(mut self, filename: &str, reply: Result<HttpReply, TransportError>) -> Self {
        self.ocr_replies.insert(filename.to_string(), reply);
        self
    }

    pub fn ocr_delay(mut self, filename: &str, delay: Duration) -> Self {
        self.ocr_delays.insert(filename.to_string(), delay);
        self
    }

    pub fn completion(mut self, reply: Result<HttpReply, TransportError>) -> Self {
        self.completion_reply = reply;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn multipart_calls(&self) -> Vec<MultipartRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Multipart { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Bodies of every JSON POST, in order.
    pub fn json_bodies(&self) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Json { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    /// The prompt of the single completion call.
    pub fn sent_prompt(&self) -> String {
        let bodies = self.json_bodies();
        assert_eq!(bodies.len(), 1, "expected exactly one completion call");
        bodies[0]["messages"][0]["content"]
            .as_str()
            .expect("prompt string")
            .to_string()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_multipart(
        &self,
        url: &str,
        request: MultipartRequest,
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let filename = request.file.filename.clone();
        self.calls.lock().unwrap().push(Call::Multipart {
            url: url.to_string(),
            request,
        });
        if let Some(delay) = self.ocr_delays.get(&filename) {
            tokio::time::sleep(*delay).await;
        }
        self.ocr_replies
            .get(&filename)
            .cloned()
            .unwrap_or_else(|| Ok(ocr_ok(&format!("text of {filename}"))))
    }

    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.calls.lock().unwrap().push(Call::Json {
            url: url.to_string(),
            bearer: bearer_token.to_string(),
            body: body.clone(),
        });
        self.completion_reply.clone()
    }
}

/// A successful OCR.space reply.
pub fn ocr_ok(text: &str) -> HttpReply {
    HttpReply::new(
        200,
        serde_json::json!({
            "IsErroredOnProcessing": false,
            "ParsedResults": [{ "ParsedText": text }]
        })
        .to_string(),
    )
}

/// A successful chat-completion reply.
pub fn completion_ok(content: &str) -> HttpReply {
    HttpReply::new(
        200,
        serde_json::json!({
            "id": "gen-test",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
        .to_string(),
    )
}

/// Build a PDF with one text line per page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}
