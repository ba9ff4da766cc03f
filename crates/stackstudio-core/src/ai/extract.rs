//! Structured-output extraction
//!
//! Recovers the `{code, message, ...}` payload from free-form model text.
//! Models frequently violate formatting instructions, so failure here is an
//! expected outcome, not an exceptional one: the whole module communicates
//! absence with `None` and records diagnostics through `tracing` instead of
//! returning errors.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The payload recovered from a provider response
///
/// `code` and `message` are mandatory and non-empty on every value this
/// module returns; callers may rely on "non-null implies usable". The
/// remaining fields only appear in full-stack output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// Complete document body; opaque, never validated as HTML
    pub code: String,
    /// Short human-readable confirmation
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
}

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```json").unwrap());
static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Ordered repair transforms, each applied independently to the sliced text
///
/// Chain of responsibility: after each transform the result is re-parsed and
/// re-validated, short-circuiting on the first success.
const REPAIRS: &[fn(&str) -> String] = &[
    remove_trailing_commas,
    close_unterminated_string,
    strip_control_chars,
    balanced_prefix,
    strip_controls_then_balance,
];

/// Recover a structured result from raw provider text
///
/// Never panics and never errors; `None` means no valid result survived any
/// repair strategy.
pub fn extract(raw: &str) -> Option<StructuredResult> {
    if raw.trim().is_empty() {
        debug!("extract: empty text provided");
        return None;
    }

    let cleaned = strip_fences(raw);

    let (Some(first), Some(last)) = (cleaned.find('{'), cleaned.rfind('}')) else {
        debug!("extract: no JSON object delimiters found");
        log_failure(raw);
        return None;
    };
    if last < first {
        debug!("extract: closing brace precedes opening brace");
        log_failure(raw);
        return None;
    }

    let candidate = &cleaned[first..=last];

    if let Some(result) = parse_validated(candidate) {
        return Some(result);
    }

    debug!("extract: direct parse failed, attempting repairs");
    for repair in REPAIRS {
        let fixed = repair(candidate);
        if let Some(result) = parse_validated(&fixed) {
            debug!("extract: recovered JSON after repair");
            return Some(result);
        }
    }

    log_failure(raw);
    None
}

/// Parse and enforce the mandatory-field invariant
fn parse_validated(candidate: &str) -> Option<StructuredResult> {
    let result: StructuredResult = serde_json::from_str(candidate).ok()?;
    if result.code.is_empty() || result.message.is_empty() {
        debug!("extract: parsed object is missing code or message");
        return None;
    }
    Some(result)
}

/// Remove markdown code-fence markers and surrounding whitespace
fn strip_fences(raw: &str) -> String {
    let without_tagged = JSON_FENCE.replace_all(raw, "");
    without_tagged.replace("```", "").trim().to_string()
}

/// Remove trailing commas immediately preceding a closing brace/bracket
fn remove_trailing_commas(s: &str) -> String {
    TRAILING_COMMA.replace_all(s, "$1").into_owned()
}

/// Close an unterminated string before the final brace
///
/// An odd quote count means some string literal never ended; terminating it
/// just before the last `}` recovers payloads cut off inside a value.
fn close_unterminated_string(s: &str) -> String {
    let quote_count = s.matches('"').count();
    if quote_count % 2 == 0 {
        return s.to_string();
    }
    if let (Some(last_quote), Some(last_brace)) = (s.rfind('"'), s.rfind('}')) {
        if last_brace > last_quote {
            return format!("{}\"}}}}", &s[..last_brace]);
        }
    }
    s.to_string()
}

/// Strip ASCII control characters
///
/// Models sometimes emit raw newlines/tabs inside string literals instead of
/// escaped equivalents, which breaks strict JSON parsing.
fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}'))
        .collect()
}

/// Return the leading complete JSON object, discarding trailing garbage
///
/// Scans character by character tracking brace depth, respecting string and
/// escape state: a quote toggles in-string unless preceded by an unescaped
/// backslash, and braces only count outside strings.
fn balanced_prefix(s: &str) -> String {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return s[..idx + 1].to_string();
                }
            }
            _ => {}
        }
    }

    s.to_string()
}

/// Composed repair for the common combination: raw control characters inside
/// a string value plus a second malformed object trailing the first
fn strip_controls_then_balance(s: &str) -> String {
    balanced_prefix(&strip_control_chars(s))
}

/// Log diagnostic detail on total extraction failure
///
/// The raw text is not persisted anywhere, so length and a head/tail excerpt
/// are the only postmortem evidence.
fn log_failure(raw: &str) {
    let chars: Vec<char> = raw.chars().collect();
    let head: String = chars.iter().take(200).collect();
    let tail: String = chars[chars.len().saturating_sub(200)..].iter().collect();
    error!(
        "extract: all repair strategies failed (length: {})",
        raw.len()
    );
    error!("extract: first 200 chars: {}", head);
    error!("extract: last 200 chars: {}", tail);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(raw: &str) -> StructuredResult {
        extract(raw).expect("extraction should succeed")
    }

    #[test]
    fn test_valid_json_roundtrips() {
        let result = ok(r#"{"code": "<html></html>", "message": "Built it"}"#);
        assert_eq!(result.code, "<html></html>");
        assert_eq!(result.message, "Built it");
        assert_eq!(result.backend, None);
    }

    #[test]
    fn test_full_stack_fields_survive() {
        let raw = r#"{
            "message": "Full app ready",
            "code": "<!DOCTYPE html><html></html>",
            "backend": "const express = require('express')",
            "database": "CREATE TABLE users (id serial);",
            "setup": "npm install && npm start"
        }"#;
        let result = ok(raw);
        assert_eq!(result.backend.as_deref(), Some("const express = require('express')"));
        assert_eq!(result.database.as_deref(), Some("CREATE TABLE users (id serial);"));
        assert_eq!(result.setup.as_deref(), Some("npm install && npm start"));
    }

    #[test]
    fn test_markdown_fences_are_stripped() {
        let fenced = "```json\n{\"code\": \"<html></html>\", \"message\": \"ok\"}\n```";
        let bare = "{\"code\": \"<html></html>\", \"message\": \"ok\"}";
        assert_eq!(extract(fenced), extract(bare));
        assert!(extract(fenced).is_some());

        // Uppercase language tag
        let upper = "```JSON\n{\"code\": \"<html></html>\", \"message\": \"ok\"}\n```";
        assert_eq!(extract(upper), extract(bare));
    }

    #[test]
    fn test_scenario_prose_then_fenced_object() {
        let raw = "Here is your site:\n```json\n{\"message\": \"Built a landing page\", \"code\": \"<!DOCTYPE html><html>...</html>\"}\n```";
        let result = ok(raw);
        assert_eq!(result.message, "Built a landing page");
        assert_eq!(result.code, "<!DOCTYPE html><html>...</html>");
    }

    #[test]
    fn test_trailing_comma_is_repaired() {
        let result = ok(r#"{"code":"<html></html>","message":"ok",}"#);
        assert_eq!(result.code, "<html></html>");
        assert_eq!(result.message, "ok");
    }

    #[test]
    fn test_comma_inside_string_value_untouched() {
        let raw = r#"{"code": "<html></html>", "message": "ok", "setup": "step one,"}"#;
        let result = ok(raw);
        assert_eq!(result.setup.as_deref(), Some("step one,"));
    }

    #[test]
    fn test_raw_newline_in_string_is_repaired() {
        let raw = "{\"code\": \"<html>\nline two</html>\", \"message\": \"ok\"}";
        let result = ok(raw);
        assert_eq!(result.code, "<html>line two</html>");
    }

    #[test]
    fn test_raw_newline_with_trailing_prose() {
        let raw = "{\"code\": \"<html>\n</html>\", \"message\": \"ok\"}\nHope this helps!";
        let result = ok(raw);
        assert_eq!(result.message, "ok");
    }

    #[test]
    fn test_leading_object_recovered_from_second_malformed_object() {
        // The second object drags the last-brace slice past the good payload;
        // only the balance scan can cut it back
        let raw = r#"{"code": "<html></html>", "message": "ok"}{"second": }"#;
        let result = ok(raw);
        assert_eq!(result.code, "<html></html>");
    }

    #[test]
    fn test_raw_newline_and_second_malformed_object() {
        let raw = "{\"code\": \"<html>\n</html>\", \"message\": \"ok\"}\n{\"oops\": ";
        let result = ok(raw);
        assert_eq!(result.code, "<html></html>");

        // Both defects at once: control character inside a string plus a
        // trailing malformed object with its own closing brace
        let raw = "{\"code\": \"<html>\n</html>\", \"message\": \"ok\"}\n{\"oops\": }";
        let result = ok(raw);
        assert_eq!(result.code, "<html></html>");
    }

    #[test]
    fn test_no_braces_returns_none() {
        assert_eq!(extract("no json here at all"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("   \n  "), None);
    }

    #[test]
    fn test_reversed_braces_return_none() {
        assert_eq!(extract("} nothing opens here {"), None);
    }

    #[test]
    fn test_empty_mandatory_field_returns_none() {
        assert_eq!(extract(r#"{"code": "<html></html>", "message": ""}"#), None);
        assert_eq!(extract(r#"{"code": "", "message": "ok"}"#), None);
        assert_eq!(extract(r#"{"message": "ok"}"#), None);
        assert_eq!(extract(r#"{"code": "<html></html>"}"#), None);
    }

    #[test]
    fn test_idempotence() {
        let inputs = [
            r#"{"code": "<html></html>", "message": "ok"}"#,
            "```json\n{\"code\": \"x\", \"message\": \"y\",}\n```",
            "not json",
        ];
        for input in inputs {
            assert_eq!(extract(input), extract(input));
        }
    }

    #[test]
    fn test_escaped_quotes_do_not_confuse_balancing() {
        let raw = r#"{"code": "<a href=\"x\">{}</a>", "message": "ok"} extra"#;
        let result = ok(raw);
        assert_eq!(result.code, r#"<a href="x">{}</a>"#);
    }

    #[test]
    fn test_braces_inside_strings_do_not_close_early() {
        let raw = r#"{"code": "<style>body { margin: 0; }</style>", "message": "ok"}"#;
        let result = ok(raw);
        assert!(result.code.contains("margin: 0;"));
    }

    // Individual repair transforms

    #[test]
    fn test_remove_trailing_commas() {
        assert_eq!(remove_trailing_commas(r#"{"a": 1,}"#), r#"{"a": 1}"#);
        assert_eq!(remove_trailing_commas("[1, 2, ]"), "[1, 2]");
        assert_eq!(remove_trailing_commas(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_close_unterminated_string() {
        let broken = r#"{"code": "<html>", "message": "cut off}"#;
        let fixed = close_unterminated_string(broken);
        assert_eq!(fixed.matches('"').count() % 2, 0);

        let fine = r#"{"a": "b"}"#;
        assert_eq!(close_unterminated_string(fine), fine);
    }

    #[test]
    fn test_strip_control_chars() {
        assert_eq!(strip_control_chars("a\nb\tc\u{7f}d"), "abcd");
        assert_eq!(strip_control_chars("clean"), "clean");
    }

    #[test]
    fn test_balanced_prefix() {
        assert_eq!(balanced_prefix(r#"{"a": {"b": 1}} tail"#), r#"{"a": {"b": 1}}"#);
        assert_eq!(balanced_prefix(r#"{"a": "}"} tail"#), r#"{"a": "}"}"#);
        // Unbalanced input comes back unchanged
        assert_eq!(balanced_prefix(r#"{"a": 1"#), r#"{"a": 1"#);
    }
}
