//! Word entries and the wordlist aggregate

use serde::{Deserialize, Serialize};

/// Structured vocabulary record for one token
///
/// Built from a validated model reply. After construction only the run
/// metadata (`lesson`, `category`) is changed, and only by
/// [`WordEntry::stamp`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// The term itself
    pub word: String,

    /// Leading morpheme, empty when not applicable
    #[serde(default)]
    pub prefix: String,

    /// Root morpheme, empty when not applicable
    #[serde(default)]
    pub root: String,

    /// Trailing morpheme, empty when not applicable
    #[serde(default)]
    pub suffix: String,

    /// Short meaning
    #[serde(default)]
    pub meaning: String,

    /// Longer explanation
    #[serde(default)]
    pub explanation: String,

    /// Simplified Chinese translation
    #[serde(default)]
    pub chinese_translation: String,

    /// Traditional Chinese translation
    #[serde(default)]
    pub traditional_chinese_translation: String,

    /// Lesson the entry belongs to (always taken from the run, never the model)
    #[serde(default)]
    pub lesson: u32,

    /// Optional grouping such as "oncology"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl WordEntry {
    /// Create an entry with only the word set
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    /// Apply run metadata
    ///
    /// The lesson always overwrites whatever the model produced. A category
    /// override replaces the model's category; `None` keeps it.
    pub fn stamp(&mut self, lesson: u32, category: Option<&str>) {
        self.lesson = lesson;
        if let Some(category) = category {
            self.category = Some(category.to_string());
        }
    }
}

/// Versioned collection of entries written at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wordlist {
    /// Schema version string supplied by the run
    pub version: String,

    /// Successful entries; position carries no meaning
    pub words: Vec<WordEntry>,
}

impl Wordlist {
    /// Create an empty wordlist
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            words: Vec::new(),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the wordlist has no entries
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
