//! Medlex CLI library.
//!
//! Glue between the command line, the input/output files, and the
//! `medlex-generator` pipeline.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod run;

pub use cli::Cli;
pub use config::ResolvedRun;
pub use error::{CliError, Result};
pub use output::Formatter;
