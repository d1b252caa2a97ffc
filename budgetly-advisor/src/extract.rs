//! Permissive JSON extraction from model replies.
//!
//! Replies often arrive wrapped in prose or markdown fences. Strategy:
//! strict parse first, then slice out the span from the first `{` to the
//! last `}` (or `[` to `]`) and parse that.

use anyhow::{bail, Result};
use serde_json::Value;

/// Parse `reply` into a JSON value, tolerating surrounding text.
pub fn extract_json(reply: &str) -> Result<Value> {
    let trimmed = reply.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(value) = extract_span(trimmed, '{', '}') {
        return Ok(value);
    }
    if let Some(value) = extract_span(trimmed, '[', ']') {
        return Ok(value);
    }

    bail!("no JSON object or array found in reply");
}

fn extract_span(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json_passes_through() {
        let v = extract_json(r#"{"cuts": [], "next_purchases": []}"#).unwrap();
        assert!(v["cuts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_object_inside_prose() {
        let reply = "Sure! Here is the advice you asked for:\n```json\n{\"cuts\": [1]}\n```\nHope it helps.";
        let v = extract_json(reply).unwrap();
        assert_eq!(v["cuts"][0], 1);
    }

    #[test]
    fn test_array_inside_prose() {
        let reply = "Top picks: [{\"merchant\": \"Store\"}] as requested";
        let v = extract_json(reply).unwrap();
        assert_eq!(v[0]["merchant"], "Store");
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(extract_json("I cannot answer that.").is_err());
        assert!(extract_json("").is_err());
    }

    #[test]
    fn test_unbalanced_braces_error() {
        assert!(extract_json("oops { \"a\": ").is_err());
    }
}
