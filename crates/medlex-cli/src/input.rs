//! Reading the input word list.

use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON array of strings
    Json,
    /// One term per line
    Lines,
}

impl InputFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(InputFormat::Json),
            "txt" | "text" | "lst" => Ok(InputFormat::Lines),
            other => Err(CliError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read every raw token from the input file.
///
/// Tokens are returned as written; normalization and deduplication happen in
/// the pipeline.
pub fn read_tokens(path: &Path) -> Result<Vec<String>> {
    let format = InputFormat::from_path(path)?;
    let contents = fs::read_to_string(path)?;
    parse_tokens(&contents, format)
}

/// Parse tokens from file contents.
pub fn parse_tokens(contents: &str, format: InputFormat) -> Result<Vec<String>> {
    match format {
        InputFormat::Json => {
            let tokens: Vec<String> = serde_json::from_str(contents).map_err(|e| {
                CliError::InvalidInput(format!("expected a JSON array of strings: {}", e))
            })?;
            Ok(tokens)
        }
        InputFormat::Lines => Ok(contents.lines().map(str::to_string).collect()),
    }
}
