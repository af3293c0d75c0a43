//! Prompt construction for word entry generation

use crate::config::SchemaVariant;
use medlex_domain::ChatMessage;
use serde_json::{json, Value};

/// Builds the chat conversation sent for each word
///
/// Every request carries the same two priming messages (task description and
/// schema instructions); only the trailing user message changes.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
    instructions: String,
}

impl PromptBuilder {
    /// Create a prompt builder for a schema variant
    pub fn new(variant: SchemaVariant) -> Self {
        let schema = output_schema(variant);
        let instructions = format!(
            "{}\n```json\n{}\n```",
            SCHEMA_INSTRUCTIONS,
            serde_json::to_string(&schema).unwrap_or_default()
        );

        Self {
            system: system_prompt(variant).to_string(),
            instructions,
        }
    }

    /// Build the full message list for one word
    pub fn build(&self, word: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::assistant(self.instructions.clone()),
            ChatMessage::user(word),
        ]
    }
}

fn system_prompt(variant: SchemaVariant) -> &'static str {
    match variant {
        SchemaVariant::Basic => SYSTEM_PROMPT_BASIC,
        SchemaVariant::Bilingual => SYSTEM_PROMPT_BILINGUAL,
    }
}

/// JSON Schema literal embedded in the instructions
pub fn output_schema(variant: SchemaVariant) -> Value {
    let mut properties = json!({
        "word": {"type": "string"},
        "prefix": {"type": "string"},
        "root": {"type": "string"},
        "suffix": {"type": "string"},
        "meaning": {"type": "string"},
        "explanation": {"type": "string"},
        "chineseTranslation": {"type": "string"},
        "category": {"type": "string"}
    });
    if variant == SchemaVariant::Bilingual {
        properties["traditionalChineseTranslation"] = json!({"type": "string"});
    }

    json!({
        "type": "object",
        "properties": {
            "output": {
                "type": "object",
                "properties": properties,
                "additionalProperties": false
            }
        },
        "additionalProperties": false,
        "$schema": "http://json-schema.org/draft-07/schema#"
    })
}

const SYSTEM_PROMPT_BASIC: &str = "You are teaching medical terms. For each medical word, \
give its meaning, Chinese translation, an explanation, and its prefix, root, and suffix. \
Leave prefix, root, and suffix empty when they do not apply or the term is a phrase.";

const SYSTEM_PROMPT_BILINGUAL: &str = "You are teaching medical terms. For each medical word, \
give its meaning, simplified Chinese translation, traditional Chinese translation, an \
explanation, and its prefix, root, and suffix. Leave prefix, root, and suffix empty when \
they do not apply or the term is a phrase.";

const SCHEMA_INSTRUCTIONS: &str = r#"Format your output as a JSON value that conforms to the JSON Schema instance below.

A JSON Schema annotates and constrains JSON documents. For example, the schema
{"properties": {"foo": {"type": "array", "items": {"type": "string"}}}, "required": ["foo"]}
describes an object with one required property "foo" holding an array of strings, so
{"foo": ["bar", "baz"]} conforms while {"properties": {"foo": ["bar", "baz"]}} does not.

Your output is parsed and type-checked against the schema: every field must match exactly
and there must be no trailing commas.

Wrap the JSON in a markdown code block. The schema:"#;

#[cfg(test)]
mod tests {
    use super::*;
    use medlex_domain::ChatRole;

    #[test]
    fn test_prompt_has_three_messages_in_order() {
        let messages = PromptBuilder::new(SchemaVariant::Basic).build("carcinoma");
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::System, ChatRole::Assistant, ChatRole::User]);
        assert_eq!(messages[2].content, "carcinoma");
    }

    #[test]
    fn test_priming_is_identical_across_words() {
        let builder = PromptBuilder::new(SchemaVariant::Bilingual);
        let a = builder.build("otitis");
        let b = builder.build("nephritis");
        assert_eq!(a[0], b[0]);
        assert_eq!(a[1], b[1]);
    }

    #[test]
    fn test_instructions_embed_schema_in_fence() {
        let messages = PromptBuilder::new(SchemaVariant::Bilingual).build("x");
        let instructions = &messages[1].content;
        assert!(instructions.contains("```json\n"));
        assert!(instructions.contains("traditionalChineseTranslation"));
        assert!(instructions.trim_end().ends_with("```"));
    }

    #[test]
    fn test_basic_schema_omits_traditional() {
        let schema = output_schema(SchemaVariant::Basic);
        let props = &schema["properties"]["output"]["properties"];
        assert!(props.get("chineseTranslation").is_some());
        assert!(props.get("traditionalChineseTranslation").is_none());
    }
}
