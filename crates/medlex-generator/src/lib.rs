//! Medlex Generator
//!
//! Turns a list of medical terms into a versioned wordlist by asking an LLM
//! for one structured entry per term.
//!
//! # Architecture
//!
//! ```text
//! tokens → normalize/dedup → ConcurrentDispatcher ─┬→ RetryingTask → WordEntryGenerator → LLM
//!                                                  └→ ordered TaskResults → WordlistAssembler → Wordlist
//! ```
//!
//! # Key Features
//!
//! - **Fence-tolerant parsing**: replies may wrap their JSON in a markdown code block
//! - **Graceful degradation**: malformed replies and transport errors are retried,
//!   then recorded as per-token failures instead of aborting the run
//! - **Bounded concurrency**: a fixed-width pool with order-preserving results
//!
//! # Example Usage
//!
//! ```no_run
//! use medlex_generator::{GeneratorConfig, RunOptions, WordlistPipeline};
//! use medlex_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(MockProvider::new(r#"{"output": {"word": "carcinoma"}}"#));
//! let pipeline = WordlistPipeline::new(
//!     provider,
//!     &GeneratorConfig::default(),
//!     RunOptions::new(3, "1.0"),
//! )?;
//!
//! let outcome = pipeline.run(&["Carcinoma", "carcinoma"]).await;
//! println!("{}", outcome.summary.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assembler;
mod config;
mod dispatcher;
mod error;
mod generator;
mod parser;
mod pipeline;
mod prompt;
mod retry;


pub use assembler::{normalize_tokens, to_pretty_json, WordlistAssembler};
pub use config::{GeneratorConfig, SchemaVariant};
pub use dispatcher::{ConcurrentDispatcher, ProgressEvent, ProgressObserver, DEFAULT_CONCURRENCY};
pub use error::{GenerationError, GeneratorError, ParseError, RetryExhausted};
pub use generator::{entry_from_record, Record, WordEntryGenerator};
pub use parser::{extract_json, parse_llm_response, validate_response};
pub use pipeline::{RunOptions, RunOutcome, WordlistPipeline};
pub use prompt::{output_schema, PromptBuilder};
pub use retry::{RetryPolicy, RetryingTask};
