//! Lenient parsing for model-produced JSON.
//!
//! Small models routinely wrap JSON in markdown fences, leave trailing
//! commas, or drop a comma between adjacent values. Parsing goes in
//! three attempts: raw, after textual cleanup, and after a positional
//! fix at the reported error location.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::AiError;

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").unwrap());
static STRING_NEWLINE_STRING: Lazy<Regex> = Lazy::new(|| Regex::new("\"\\s*\n\\s*\"").unwrap());
static BRACE_NEWLINE_BRACE: Lazy<Regex> = Lazy::new(|| Regex::new("\\}\\s*\n\\s*\\{").unwrap());
static BRACKET_NEWLINE_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new("\\]\\s*\n\\s*\\[").unwrap());
static BRACE_BRACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\}\s*\{").unwrap());
static BRACE_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\}\s*\[").unwrap());
static BRACKET_BRACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]\s*\{").unwrap());
static VALUE_THEN_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\d|true|false|null)\s+(")"#).unwrap());
static BRACE_THEN_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\})\s+(")"#).unwrap());
static BRACKET_THEN_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\])\s+(")"#).unwrap());

/// Remove markdown code fences around a JSON payload.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Textual cleanup: BOM, comments, trailing commas, missing commas
/// between adjacent tokens.
pub fn clean_json_text(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = LINE_COMMENT.replace_all(text, "");
    let text = BLOCK_COMMENT.replace_all(&text, "");
    let text = TRAILING_COMMA.replace_all(&text, "$1");
    let text = STRING_NEWLINE_STRING.replace_all(&text, "\",\n\"");
    let text = BRACE_NEWLINE_BRACE.replace_all(&text, "},\n{");
    let text = BRACKET_NEWLINE_BRACKET.replace_all(&text, "],\n[");
    let text = BRACE_BRACE.replace_all(&text, "},{");
    let text = BRACE_BRACKET.replace_all(&text, "},[");
    let text = BRACKET_BRACE.replace_all(&text, "],{");
    let text = VALUE_THEN_QUOTE.replace_all(&text, "$1,$2");
    let text = BRACE_THEN_QUOTE.replace_all(&text, "$1,$2");
    let text = BRACKET_THEN_QUOTE.replace_all(&text, "$1,$2");
    text.into_owned()
}

/// Insert a comma at the error position when the shape suggests one is
/// missing (a quote or brace right after a closed value).
fn fix_at_position(text: &str, pos: usize) -> String {
    let bytes = text.as_bytes();
    if pos == 0 || pos >= bytes.len() {
        return text.to_string();
    }
    let at = bytes[pos];
    let prev = bytes[pos - 1];
    let needs_comma = (at == b'"' && (prev == b'}' || prev == b']' || prev.is_ascii_digit()))
        || (at == b'{' && prev == b'}');
    if needs_comma {
        let mut fixed = String::with_capacity(text.len() + 1);
        fixed.push_str(&text[..pos]);
        fixed.push(',');
        fixed.push_str(&text[pos..]);
        fixed
    } else {
        text.to_string()
    }
}

/// Byte offset of a 1-based (line, column) pair as reported by serde.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, l) in text.split('\n').enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1).min(l.len());
        }
        offset += l.len() + 1;
    }
    text.len().saturating_sub(1)
}

/// Parse model output, falling back through cleanup and positional fix.
pub fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Result<T, AiError> {
    let text = strip_code_fences(raw);
    if let Ok(v) = serde_json::from_str::<T>(&text) {
        return Ok(v);
    }

    let cleaned = clean_json_text(&text);
    let err = match serde_json::from_str::<T>(&cleaned) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };

    debug!(line = err.line(), column = err.column(), "cleanup parse failed, trying positional fix");
    let pos = byte_offset(&cleaned, err.line(), err.column());
    let fixed = fix_at_position(&cleaned, pos);
    serde_json::from_str::<T>(&fixed).map_err(|e| AiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{\"name\": \"Pho\"}\n```";
        let v: Value = parse_lenient(raw).unwrap();
        assert_eq!(v["name"], "Pho");
    }

    #[test]
    fn removes_trailing_commas_and_comments() {
        let raw = "{\n  // breakfast\n  \"name\": \"Pho\",\n}";
        let v: Value = parse_lenient(raw).unwrap();
        assert_eq!(v["name"], "Pho");
    }

    #[test]
    fn fixes_missing_comma_after_number() {
        let raw = r#"{"name": "Test", "value": 123 "next": "value"}"#;
        let v: Value = parse_lenient(raw).unwrap();
        assert_eq!(v["value"], 123);
        assert_eq!(v["next"], "value");
    }

    #[test]
    fn fixes_missing_comma_between_objects() {
        let raw = r#"{"items": [{"name": "A", "value": 1}{"name": "B", "value": 2}]}"#;
        let v: Value = parse_lenient(raw).unwrap();
        assert_eq!(v["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn fixes_missing_comma_after_string_across_lines() {
        let raw = "{\"a\": \"x\"\n\"b\": \"y\"}";
        let v: Value = parse_lenient(raw).unwrap();
        assert_eq!(v["b"], "y");
    }

    #[test]
    fn reports_unfixable_input() {
        let err = parse_lenient::<Value>("not json at all").unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));
    }
}
