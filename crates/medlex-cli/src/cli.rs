//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Number of tokens processed when --debug is set
pub const DEBUG_TOKEN_LIMIT: usize = 5;

/// Medlex - generate a medical vocabulary wordlist with an LLM.
#[derive(Debug, Parser)]
#[command(name = "medlex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input word list (.json array of strings, or .txt with one term per line)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output wordlist JSON file (overwritten)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Lesson number stamped on every entry
    #[arg(short, long, default_value_t = 1)]
    pub lesson: u32,

    /// Version string written into the wordlist
    #[arg(long, default_value = "1.0")]
    pub schema_version: String,

    /// Only process the first 5 terms
    #[arg(long)]
    pub debug: bool,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Attempts per term before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Generator configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Category applied to every entry, replacing the model's
    #[arg(long)]
    pub category: Option<String>,

    /// Schema the model is asked to follow
    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,

    /// API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Also write failed terms and reasons to this JSON file
    #[arg(long)]
    pub failures: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Schema variant argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VariantArg {
    /// Simplified Chinese only
    Basic,
    /// Simplified and traditional Chinese
    Bilingual,
}

impl From<VariantArg> for medlex_generator::SchemaVariant {
    fn from(variant: VariantArg) -> Self {
        match variant {
            VariantArg::Basic => medlex_generator::SchemaVariant::Basic,
            VariantArg::Bilingual => medlex_generator::SchemaVariant::Bilingual,
        }
    }
}
