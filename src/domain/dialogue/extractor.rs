//! Recovery of a JSON object from loosely formatted model output.
//!
//! The model is asked for raw JSON but regularly wraps it in prose or code
//! fences, emits several candidates, or stops mid-object. Extraction takes the
//! first balanced object that parses and fails cleanly on everything else.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::errors::{ExtractionError, SanitizationError};

/// Maximum accepted response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

const FENCE: &str = "```";

/// Parses `text` as a JSON object, falling back to [`extract_json_object`].
pub fn parse_object(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text.trim()) {
        return Ok(map);
    }
    extract_json_object(text)
}

/// Extracts the first balanced, parseable JSON object from `text`.
///
/// # Steps
/// 1. Sanitize (length cap, control characters)
/// 2. Prefer the body of the first code fence
/// 3. Scan for balanced braces, tracking string literals and escapes
/// 4. Parse each candidate in order; the first object wins
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    let sanitized = sanitize(text)?;
    let fenced = strip_code_fences(&sanitized);

    match scan_objects(&fenced) {
        Ok(map) => Ok(map),
        Err(_) if fenced != sanitized.as_str() => scan_objects(&sanitized),
        Err(err) => Err(err),
    }
}

/// Rejects oversized input and drops control characters other than
/// newlines, carriage returns and tabs.
pub fn sanitize(text: &str) -> Result<String, SanitizationError> {
    if text.len() > MAX_RESPONSE_LENGTH {
        return Err(SanitizationError::TooLong {
            max: MAX_RESPONSE_LENGTH,
            actual: text.len(),
        });
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect();

    if cleaned.trim().is_empty() {
        return Err(SanitizationError::Empty);
    }
    Ok(cleaned)
}

/// Returns the body of the first code fence. An unterminated fence only has
/// its opening line removed.
fn strip_code_fences(text: &str) -> Cow<'_, str> {
    let Some(open) = text.find(FENCE) else {
        return Cow::Borrowed(text);
    };

    // Skip the language tag on the opening line.
    let after_open = &text[open + FENCE.len()..];
    let body_start = match after_open.find('\n') {
        Some(newline) => newline + 1,
        None => after_open.len(),
    };
    let body = &after_open[body_start..];

    match body.find(FENCE) {
        Some(close) => Cow::Borrowed(&body[..close]),
        None => Cow::Owned(format!("{}{}", &text[..open], body)),
    }
}

fn scan_objects(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    let mut offset = 0;
    let mut parse_error = None;

    while let Some(relative) = text[offset..].find('{') {
        let start = offset + relative;
        let end = balanced_end(text, start).ok_or(ExtractionError::Truncated)?;

        match serde_json::from_str::<Value>(&text[start..end]) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(_) => {}
            Err(e) => parse_error = Some(e.to_string()),
        }
        offset = end;
    }

    Err(parse_error
        .map(ExtractionError::ParseError)
        .unwrap_or(ExtractionError::NoObject))
}

/// Byte offset just past the brace closing the one at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
