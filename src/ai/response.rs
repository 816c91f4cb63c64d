//! LLM Reply Parsing
//!
//! Generative replies routinely wrap JSON in markdown code fences or pad it
//! with explanatory prose. This module extracts a usable `serde_json::Value`
//! from such replies or reports a parse failure the caller treats as a
//! fallback trigger.

use serde_json::Value;
use tracing::debug;

use crate::types::{Result, SmithError};

/// Extract and parse JSON from an LLM reply.
///
/// Tries, in order: fence-stripped direct parse, then the widest bracketed
/// slice of the reply (`[..]` preferred over `{..}` since structure replies
/// are arrays).
pub fn parse_json_reply(reply: &str) -> Result<Value> {
    let cleaned = strip_code_fences(reply);

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Ok(value);
    }

    debug!("Direct JSON parse failed, extracting bracketed slice");

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let Some(slice) = bracketed_slice(cleaned, open, close)
            && let Ok(value) = serde_json::from_str::<Value>(slice)
        {
            return Ok(value);
        }
    }

    Err(SmithError::llm(format!(
        "Failed to parse JSON reply. Content preview: {}...",
        cleaned.chars().take(200).collect::<String>()
    )))
}

/// Strip a markdown code-fence wrapper (```json ... ``` or ``` ... ```),
/// the BOM, and surrounding whitespace.
pub fn strip_code_fences(reply: &str) -> &str {
    let mut s = reply.trim().trim_start_matches('\u{feff}').trim();

    if s.starts_with("```") {
        // Drop the opening fence line (``` or ```json)
        s = match s.find('\n') {
            Some(pos) => &s[pos + 1..],
            None => s.trim_start_matches('`'),
        };
        if let Some(pos) = s.rfind("```") {
            s = &s[..pos];
        }
    }

    s.trim()
}

/// Widest `open..=close` slice of the text, if both brackets are present.
fn bracketed_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start { Some(&text[start..=end]) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_array() {
        let value = parse_json_reply(r#"[{"key": "executive_summary"}]"#).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_fenced_json() {
        let reply = "```json\n[{\"key\": \"pricing\"}]\n```";
        let value = parse_json_reply(reply).unwrap();
        assert_eq!(value[0]["key"], "pricing");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let reply = "```\n{\"key\": \"scope\"}\n```";
        let value = parse_json_reply(reply).unwrap();
        assert_eq!(value["key"], "scope");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let reply = "Here is the structure you asked for:\n[{\"key\": \"team\"}]\nHope it helps!";
        let value = parse_json_reply(reply).unwrap();
        assert_eq!(value[0]["key"], "team");
    }

    #[test]
    fn test_unparseable_reply_is_llm_error() {
        let result = parse_json_reply("I cannot answer that.");
        assert!(matches!(result, Err(SmithError::Llm(_))));
    }

    #[test]
    fn test_strip_fences_is_noop_on_plain_text() {
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }
}
