//! Token normalization before dispatch and wordlist assembly after it

use crate::error::GeneratorError;
use medlex_domain::{normalize_token, RunSummary, TaskResult, Wordlist};
use std::collections::HashSet;

/// Normalize and deduplicate raw tokens
///
/// Trims and lower-cases each token, drops blanks, and keeps the first
/// occurrence of each normalized form in its original position.
pub fn normalize_tokens<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|token| normalize_token(token.as_ref()))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Stamps run metadata onto successful entries and wraps them in a [`Wordlist`]
#[derive(Debug, Clone)]
pub struct WordlistAssembler {
    lesson: u32,
    version: String,
    category: Option<String>,
}

impl WordlistAssembler {
    /// Create an assembler for a lesson and schema version
    pub fn new(lesson: u32, version: impl Into<String>) -> Self {
        Self {
            lesson,
            version: version.into(),
            category: None,
        }
    }

    /// Override every entry's category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Keep the successes, stamp them, and tally the run
    pub fn assemble(&self, results: &[TaskResult]) -> (Wordlist, RunSummary) {
        let words = results
            .iter()
            .filter_map(TaskResult::entry)
            .cloned()
            .map(|mut entry| {
                entry.stamp(self.lesson, self.category.as_deref());
                entry
            })
            .collect();

        let wordlist = Wordlist {
            version: self.version.clone(),
            words,
        };
        (wordlist, RunSummary::from_results(results))
    }
}

/// Serialize a wordlist as pretty-printed JSON
///
/// `serde_json` writes non-ASCII characters as-is, so translations stay
/// readable in the output file.
pub fn to_pretty_json(wordlist: &Wordlist) -> Result<String, GeneratorError> {
    Ok(serde_json::to_string_pretty(wordlist)?)
}
