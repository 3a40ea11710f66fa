use async_trait::async_trait;
use futures_util::StreamExt;

use crate::errors::{TarsError, TarsResult};
use crate::llm::provider::VisionModel;
use crate::llm::sse_parser;
use crate::llm::types::{CallConfig, ChatMessage, LlmResponse, StreamChunkKind};

pub struct OpenAiCompatibleProvider {
    id: String,
    api_base: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(id: String, api_base: String, api_key: String) -> Self {
        Self {
            id,
            api_base,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &crate::config::ModelConfig) -> Self {
        Self::new(cfg.display_name.clone(), cfg.api_base.clone(), cfg.resolve_api_key())
    }
}

#[async_trait]
impl VisionModel for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.id
    }

    async fn complete(&self, messages: Vec<ChatMessage>, cfg: &CallConfig) -> TarsResult<LlmResponse> {
        let body = request_body(&messages, cfg);

        tracing::debug!(
            provider = %self.id,
            model = %cfg.model,
            stream = cfg.stream,
            "sending LLM request"
        );
        tracing::debug!(body = %redact_images(&body), "request body (base64 omitted)");

        let mut request = self.client.post(&self.api_base).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(TarsError::LlmProvider(format!("{}: {}", status, err_body)));
        }

        if cfg.stream {
            self.handle_stream(response).await
        } else {
            self.handle_json(response).await
        }
    }
}

impl OpenAiCompatibleProvider {
    /// Drain an SSE response, accumulating content and reasoning deltas.
    async fn handle_stream(&self, response: reqwest::Response) -> TarsResult<LlmResponse> {
        let mut byte_stream = response.bytes_stream();
        let mut acc = StreamAccumulator::default();

        while let Some(result) = byte_stream.next().await {
            let bytes = result?;
            if acc.push_bytes(&bytes) {
                break;
            }
        }
        acc.flush();

        tracing::info!(
            provider = %self.id,
            content_len = acc.response.content.len(),
            reasoning_len = acc.response.reasoning.len(),
            "LLM stream complete"
        );
        Ok(acc.response)
    }

    async fn handle_json(&self, response: reqwest::Response) -> TarsResult<LlmResponse> {
        let json: serde_json::Value = response.json().await?;
        let parsed = response_from_json(&json)?;
        tracing::info!(
            provider = %self.id,
            content_len = parsed.content.len(),
            "LLM JSON response received"
        );
        Ok(parsed)
    }
}

fn request_body(messages: &[ChatMessage], cfg: &CallConfig) -> serde_json::Value {
    serde_json::json!({
        "model": cfg.model,
        "messages": messages,
        "stream": cfg.stream,
        "temperature": cfg.temperature,
        "top_p": cfg.top_p,
        "max_tokens": cfg.max_tokens,
    })
}

fn response_from_json(json: &serde_json::Value) -> TarsResult<LlmResponse> {
    let message = &json["choices"][0]["message"];
    let Some(content) = message["content"].as_str() else {
        return Err(TarsError::LlmProvider(format!(
            "response has no choices[0].message.content: {json}"
        )));
    };
    Ok(LlmResponse {
        content: content.to_string(),
        reasoning: message["reasoning_content"].as_str().unwrap_or("").to_string(),
    })
}

/// Clone of the request body with image payloads replaced, for logging only.
fn redact_images(body: &serde_json::Value) -> String {
    let mut log_body = body.clone();
    if let Some(msgs) = log_body.get_mut("messages").and_then(|m| m.as_array_mut()) {
        for msg in msgs {
            // content can be string or array of parts; only the array case carries images.
            let Some(parts) = msg.get_mut("content").and_then(|c| c.as_array_mut()) else {
                continue;
            };
            for part in parts {
                if part.get("type").and_then(|t| t.as_str()) != Some("image_url") {
                    continue;
                }
                if let Some(url) = part.get_mut("image_url").and_then(|i| i.get_mut("url")) {
                    *url = serde_json::Value::String("<omitted_base64_image>".to_string());
                }
            }
        }
    }
    serde_json::to_string(&log_body).unwrap_or_default()
}

/// Line-buffers SSE bytes that may arrive split at arbitrary byte boundaries,
/// including inside a multi-byte UTF-8 character. Only whole lines are decoded.
#[derive(Debug, Default)]
struct StreamAccumulator {
    line_buf: Vec<u8>,
    response: LlmResponse,
    done: bool,
}

impl StreamAccumulator {
    /// Feed raw bytes. Returns true once the stream signalled completion.
    fn push_bytes(&mut self, bytes: &[u8]) -> bool {
        for &byte in bytes {
            if byte != b'\n' {
                self.line_buf.push(byte);
                continue;
            }
            let line = std::mem::take(&mut self.line_buf);
            self.handle_raw_line(&line);
            if self.done {
                return true;
            }
        }
        false
    }

    /// Handle a trailing line that was not newline-terminated.
    fn flush(&mut self) {
        if !self.done && !self.line_buf.is_empty() {
            let line = std::mem::take(&mut self.line_buf);
            self.handle_raw_line(&line);
        }
    }

    fn handle_raw_line(&mut self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        self.handle_line(text.trim());
    }

    fn handle_line(&mut self, line: &str) {
        match sse_parser::parse_sse_line(line) {
            Ok(Some(chunk)) => match chunk.kind {
                StreamChunkKind::Reasoning => self.response.reasoning.push_str(&chunk.content),
                StreamChunkKind::Content => self.response.content.push_str(&chunk.content),
                StreamChunkKind::Done => self.done = true,
            },
            Ok(None) => {}
            Err(e) => tracing::debug!("SSE parse skipped: {e}"),
        }
    }
}
