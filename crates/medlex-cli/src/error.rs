//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors. All of them abort the run before any request is sent.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key was supplied
    #[error("Missing API credential: set OPENAI_API_KEY or pass --api-key")]
    MissingCredential,

    /// Input file extension is not recognized
    #[error("Unsupported input format '{0}' (expected .json, .txt, .text or .lst)")]
    UnsupportedFormat(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline setup error
    #[error(transparent)]
    Generator(#[from] medlex_generator::GeneratorError),

    /// Provider setup error
    #[error(transparent)]
    Llm(#[from] medlex_llm::LlmError),
}
