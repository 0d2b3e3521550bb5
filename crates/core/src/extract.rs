use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static HTML_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```html([\s\S]*?)```").expect("valid html fence pattern"));

/// Raw model reply and the code pulled out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub raw_text: String,
    pub extracted_code: Option<String>,
}

impl GenerationResult {
    pub fn from_raw_text(raw_text: String) -> Self {
        let extracted_code = extract_html_block(&raw_text);
        Self {
            raw_text,
            extracted_code,
        }
    }
}

/// Extract the last fenced ```` ```html ```` block from a model reply.
///
/// Models that reason before answering tend to emit a draft and then a
/// corrected block, so the last one wins. Returns `None` when the reply has
/// no complete HTML fence.
pub fn extract_html_block(text: &str) -> Option<String> {
    HTML_BLOCK
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Assistant text of a buffered chat-completion response.
pub fn message_content(response: &Value) -> Option<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Collapse a server-sent-events transcript into the text it carries.
///
/// Each `data:` line holding a chat-completion chunk contributes its delta
/// (or full message) content; `[DONE]` is skipped and payloads that are not
/// JSON are kept verbatim. Text with no `data:` lines is returned unchanged.
pub fn destream_sse(text: &str) -> String {
    let mut saw_event = false;
    let mut out = String::new();

    for line in text.lines() {
        let Some(payload) = line.trim_start().strip_prefix("data:") else {
            continue;
        };
        saw_event = true;

        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(chunk) => {
                let content = chunk
                    .pointer("/choices/0/delta/content")
                    .or_else(|| chunk.pointer("/choices/0/message/content"))
                    .and_then(Value::as_str);
                if let Some(content) = content {
                    out.push_str(content);
                }
            }
            Err(_) => out.push_str(payload),
        }
    }

    if saw_event {
        out
    } else {
        text.to_string()
    }
}

/// Best available error message from a failed relay response body.
///
/// Prefers an `error` field (a string, or an object with `message`), then
/// the raw body, then a line naming the status.
pub fn relay_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = match value.get("error") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(error) => error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            None => None,
        };
        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("Relay request failed with HTTP {status}")
    } else {
        body.to_string()
    }
}
