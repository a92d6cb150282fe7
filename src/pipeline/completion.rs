//! Chat-completion call: send the prompt, return the assistant's reply.
//!
//! The request is the OpenAI-compatible minimum (OpenRouter accepts it
//! as-is): a model id and a single user message. No system message, no
//! sampling options; the instruction lives in the prompt itself.
//!
//! One attempt per batch. A failed call is reported as a
//! [`CompletionError`] that the page renders instead of the question list.

use crate::config::AnalysisConfig;
use crate::error::CompletionError;
use crate::transport::HttpTransport;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// Build the JSON request body for `prompt`.
pub fn build_request_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
    })
}

/// Send `prompt` to the configured completion endpoint.
///
/// Returns the first choice's message content on HTTP 200. Every other
/// outcome, including a transport failure, is a [`CompletionError`].
pub async fn complete(
    transport: &dyn HttpTransport,
    prompt: &str,
    config: &AnalysisConfig,
) -> Result<String, CompletionError> {
    let start = Instant::now();
    let body = build_request_body(&config.model, prompt);
    let timeout = Duration::from_secs(config.completion_timeout_secs);

    debug!(
        "Completion request: model={}, prompt {} bytes",
        config.model,
        prompt.len()
    );

    let reply = transport
        .post_json(
            &config.completion_endpoint,
            &config.completion_api_key,
            &body,
            timeout,
        )
        .await
        .map_err(|e| {
            warn!("Completion request failed: {}", e);
            CompletionError::Transport {
                detail: e.to_string(),
            }
        })?;

    let result = parse_completion_response(reply.status, &reply.body);
    match &result {
        Ok(content) => info!(
            "Completion: {} bytes in {}ms",
            content.len(),
            start.elapsed().as_millis()
        ),
        Err(e) => warn!("Completion failed: {}", e),
    }
    result
}

/// Interpret a completion reply.
pub fn parse_completion_response(status: u16, body: &str) -> Result<String, CompletionError> {
    if status != 200 {
        return Err(CompletionError::Status {
            code: status,
            body: body.to_string(),
        });
    }

    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::MalformedResponse {
            detail: e.to_string(),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::MalformedResponse {
            detail: "no choices[0].message.content".to_string(),
        })
}
