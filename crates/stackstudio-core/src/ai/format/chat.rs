//! Chat-completions format handler
//!
//! Builds request bodies for OpenAI-compatible endpoints (OpenRouter, Groq,
//! NVIDIA) and extracts the first choice's text from their responses.

use serde_json::{json, Value};

use crate::ai::providers::{ProviderConfig, ProviderId};
use crate::constants;
use crate::error::ProviderError;

/// System instruction sent ahead of every prompt
pub const SYSTEM_INSTRUCTION: &str = "You must return ONLY valid raw JSON.";

/// Build the request body for a chat-completions call
///
/// Two-message exchange, low temperature, non-streaming. NVIDIA's gateway is
/// unstable with nucleus sampling defaults, so its requests pin `top_p`.
pub fn build_request_body(config: &ProviderConfig, prompt: &str) -> Value {
    let mut body = json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": SYSTEM_INSTRUCTION },
            { "role": "user", "content": prompt }
        ],
        "temperature": constants::generation::TEMPERATURE,
        "max_tokens": constants::generation::CHAT_MAX_TOKENS,
        "stream": false
    });

    if config.id == ProviderId::Nvidia {
        body["top_p"] = json!(1);
    }

    body
}

/// Extract the message text from a chat-completions response
///
/// Absence of any choice is itself an error; a `length` finish reason means
/// the output was cut off and is surfaced as the distinct truncation kind.
pub fn parse_response(provider: ProviderId, response: &Value) -> Result<String, ProviderError> {
    let choice = response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .ok_or(ProviderError::EmptyResponse { provider })?;

    if choice.get("finish_reason").and_then(|r| r.as_str()) == Some("length") {
        return Err(ProviderError::Truncated { provider });
    }

    let text = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .unwrap_or("")
        .trim();

    if text.is_empty() {
        return Err(ProviderError::EmptyResponse { provider });
    }

    Ok(text.to_string())
}
