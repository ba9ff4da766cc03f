//! Generative-content format handler
//!
//! Builds request bodies for Google's generative-content API and inspects
//! its responses. This family diverges structurally from chat-completions:
//! the prompt rides in a single content part, the request carries safety
//! overrides and a JSON mime hint, and the response must be branched on
//! `finishReason` before any text is trusted.

use serde_json::{json, Value};

use crate::ai::providers::ProviderId;
use crate::constants;
use crate::error::ProviderError;

/// Exact-format directive appended to every generative-content prompt
///
/// This family ignores system-message conventions, so the format contract is
/// pushed into the prompt itself.
pub const JSON_FORMAT_DIRECTIVE: &str = r#"CRITICAL: Your response MUST be ONLY valid JSON with this EXACT format:
{
  "message": "short confirmation text here",
  "code": "complete HTML code here"
}

NO markdown, NO explanations, NO extra text. ONLY the JSON object."#;

/// Safety categories overridden to permissive thresholds
///
/// Marketing copy and business content trip false-positive blocks at the
/// default thresholds.
const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Append the strict JSON directive to the prompt
pub fn augment_prompt(prompt: &str) -> String {
    format!("{prompt}\n\n{JSON_FORMAT_DIRECTIVE}")
}

/// Build the request body for a generative-content call
pub fn build_request_body(prompt: &str) -> Value {
    let safety_settings: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|category| {
            json!({
                "category": category,
                "threshold": "BLOCK_NONE"
            })
        })
        .collect();

    json!({
        "contents": [{
            "parts": [{ "text": augment_prompt(prompt) }]
        }],
        "generationConfig": {
            "temperature": constants::generation::TEMPERATURE,
            "maxOutputTokens": constants::generation::GENERATIVE_MAX_TOKENS,
            "responseMimeType": "application/json"
        },
        "safetySettings": safety_settings
    })
}

/// Extract the candidate text from a generative-content response
///
/// `SAFETY` and `RECITATION` are terminal for the current prompt and must
/// not be retried identically; `MAX_TOKENS` is the distinct truncation kind.
/// A prompt-level block arrives with no candidates at all, only
/// `promptFeedback.blockReason`.
pub fn parse_response(provider: ProviderId, response: &Value) -> Result<String, ProviderError> {
    let candidate = match response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
    {
        Some(candidate) => candidate,
        None => {
            if response
                .pointer("/promptFeedback/blockReason")
                .and_then(|b| b.as_str())
                .is_some()
            {
                return Err(ProviderError::SafetyBlocked { provider });
            }
            return Err(ProviderError::EmptyResponse { provider });
        }
    };

    match candidate.get("finishReason").and_then(|r| r.as_str()) {
        Some("SAFETY") => return Err(ProviderError::SafetyBlocked { provider }),
        Some("RECITATION") => return Err(ProviderError::RecitationBlocked { provider }),
        Some("MAX_TOKENS") => return Err(ProviderError::Truncated { provider }),
        _ => {}
    }

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::EmptyResponse { provider });
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: ProviderId = ProviderId::Gemini;

    #[test]
    fn test_body_shape() {
        let body = build_request_body("build a cafe site");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("build a cafe site"));
        assert!(text.contains("ONLY valid JSON"));
        assert_eq!(body["generationConfig"]["temperature"], 0.2);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_body_safety_overrides() {
        let body = build_request_body("hello");
        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        for setting in settings {
            assert_eq!(setting["threshold"], "BLOCK_NONE");
        }
        assert!(settings
            .iter()
            .any(|s| s["category"] == "HARM_CATEGORY_DANGEROUS_CONTENT"));
    }

    #[test]
    fn test_parse_joins_text_parts() {
        let response = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "{\"message\":" }, { "text": "\"ok\"}" }]
                },
                "finishReason": "STOP"
            }]
        });
        let text = parse_response(PROVIDER, &response).unwrap();
        assert_eq!(text, "{\"message\":\"ok\"}");
    }

    #[test]
    fn test_parse_safety_block() {
        let response = json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        });
        assert_eq!(
            parse_response(PROVIDER, &response).unwrap_err(),
            ProviderError::SafetyBlocked { provider: PROVIDER }
        );
    }

    #[test]
    fn test_parse_recitation_block() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "partial" }] },
                "finishReason": "RECITATION"
            }]
        });
        assert_eq!(
            parse_response(PROVIDER, &response).unwrap_err(),
            ProviderError::RecitationBlocked { provider: PROVIDER }
        );
    }

    #[test]
    fn test_parse_max_tokens_is_truncated() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"code\": \"<html" }] },
                "finishReason": "MAX_TOKENS"
            }]
        });
        assert_eq!(
            parse_response(PROVIDER, &response).unwrap_err(),
            ProviderError::Truncated { provider: PROVIDER }
        );
    }

    #[test]
    fn test_parse_prompt_level_block() {
        let response = json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        });
        assert_eq!(
            parse_response(PROVIDER, &response).unwrap_err(),
            ProviderError::SafetyBlocked { provider: PROVIDER }
        );
    }

    #[test]
    fn test_parse_no_candidates_is_empty() {
        let response = json!({ "candidates": [] });
        assert_eq!(
            parse_response(PROVIDER, &response).unwrap_err(),
            ProviderError::EmptyResponse { provider: PROVIDER }
        );
    }

    #[test]
    fn test_parse_candidate_without_parts_is_empty() {
        let response = json!({
            "candidates": [{ "content": {}, "finishReason": "STOP" }]
        });
        assert_eq!(
            parse_response(PROVIDER, &response).unwrap_err(),
            ProviderError::EmptyResponse { provider: PROVIDER }
        );
    }
}
