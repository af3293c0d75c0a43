//! Pull JSON out of model replies and validate the envelope

use crate::error::ParseError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// First fenced block: opening fence, optional language tag, body up to the
/// first closing fence.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+.\-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Extract the JSON payload from a model reply
///
/// Returns the trimmed body of the first fenced code block if there is one,
/// otherwise the whole reply trimmed. Never fails.
///
/// The body ends at the first closing fence. A JSON string that itself
/// contains a triple backtick is therefore cut short, and the truncated text
/// is left for [`validate_response`] to reject.
pub fn extract_json(response: &str) -> String {
    match FENCED_BLOCK.captures(response).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => response.trim().to_string(),
    }
}

/// Parse extracted text and return the value under `output`
pub fn validate_response(text: &str) -> Result<Value, ParseError> {
    let json: Value = serde_json::from_str(text).map_err(|e| ParseError::Malformed {
        text: text.to_string(),
        diagnostic: e.to_string(),
    })?;

    match json {
        Value::Object(mut map) => map.remove("output").ok_or_else(|| ParseError::MissingField {
            field: "output",
            text: text.to_string(),
        }),
        _ => Err(ParseError::MissingField {
            field: "output",
            text: text.to_string(),
        }),
    }
}

/// Extract then validate a raw reply
pub fn parse_llm_response(response: &str) -> Result<Value, ParseError> {
    validate_response(&extract_json(response))
}
