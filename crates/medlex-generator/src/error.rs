//! Error types for the word generator

use thiserror::Error;

/// Why a model reply could not be turned into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Extracted text is not valid JSON
    #[error("Malformed JSON ({diagnostic}): {text}")]
    Malformed {
        /// Text that failed to parse
        text: String,
        /// Parser diagnostic
        diagnostic: String,
    },

    /// JSON parsed but a required key is absent
    #[error("Missing field '{field}': {text}")]
    MissingField {
        /// Name of the absent key
        field: &'static str,
        /// Text that was parsed
        text: String,
    },

    /// The `output` value is neither an object nor a single-object array
    #[error("Unexpected output shape: {0}")]
    Shape(String),
}

/// Failure of one generation attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The provider call failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The reply could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Every attempt for a token failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Exhausted {attempts} attempts: {last_error}")]
pub struct RetryExhausted {
    /// Attempts made
    pub attempts: u32,
    /// Error from the final attempt
    pub last_error: GenerationError,
}

/// Errors raised while setting up a run
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wordlist serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
