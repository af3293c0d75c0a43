//! One model request per word

use crate::config::SchemaVariant;
use crate::error::{GenerationError, ParseError};
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use medlex_domain::traits::ChatProvider;
use medlex_domain::WordEntry;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// A validated `output` object from the model
pub type Record = Map<String, Value>;

/// Issues one completion request per word and validates the reply
pub struct WordEntryGenerator<P>
where
    P: ChatProvider,
{
    provider: Arc<P>,
    prompt: PromptBuilder,
}

impl<P> WordEntryGenerator<P>
where
    P: ChatProvider,
{
    /// Create a generator for a schema variant
    pub fn new(provider: Arc<P>, variant: SchemaVariant) -> Self {
        Self {
            provider,
            prompt: PromptBuilder::new(variant),
        }
    }

    /// Request and validate an entry for one word
    ///
    /// Makes exactly one provider call. A provider failure becomes
    /// [`GenerationError::Transport`]; an unusable reply becomes
    /// [`GenerationError::Parse`].
    pub async fn generate(&self, word: &str) -> Result<Record, GenerationError> {
        let messages = self.prompt.build(word);

        let reply = self
            .provider
            .complete(&messages)
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        debug!("Reply for '{}': {} chars", word, reply.len());

        let output = parse_llm_response(&reply)?;
        Ok(into_record(output)?)
    }
}

/// Accept an object, or the single object inside a one-element array
fn into_record(output: Value) -> Result<Record, ParseError> {
    match output {
        Value::Object(map) => Ok(map),
        Value::Array(mut items) if items.len() == 1 => match items.pop() {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(ParseError::Shape(format!("array of {}", kind(&other)))),
            None => Err(ParseError::Shape("empty array".to_string())),
        },
        Value::Array(items) => Err(ParseError::Shape(format!("array of {} items", items.len()))),
        other => Err(ParseError::Shape(kind(&other).to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build a [`WordEntry`] from a record
///
/// Missing or non-string fields become empty strings. An empty `word` falls
/// back to the normalized token. `lesson` is left at zero for the assembler
/// to stamp.
pub fn entry_from_record(record: &Record, token: &str) -> WordEntry {
    let text = |key: &str| -> String {
        record
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let word = match text("word") {
        w if w.is_empty() => token.to_string(),
        w => w,
    };
    let category = Some(text("category")).filter(|c| !c.is_empty());

    WordEntry {
        word,
        prefix: text("prefix"),
        root: text("root"),
        suffix: text("suffix"),
        meaning: text("meaning"),
        explanation: text("explanation"),
        chinese_translation: text("chineseTranslation"),
        traditional_chinese_translation: text("traditionalChineseTranslation"),
        lesson: 0,
        category,
    }
}
