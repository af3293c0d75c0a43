//! Medlex Domain Layer
//!
//! Core vocabulary model shared by every other crate in the workspace.
//!
//! ## Key Concepts
//!
//! - **Token**: one input word or phrase to look up, normalized before dispatch
//! - **WordEntry**: the structured record describing one token (etymology
//!   breakdown, meaning, translations, lesson stamp)
//! - **TaskResult**: exactly one per token, either an entry or a failure reason
//! - **Wordlist**: the versioned collection written at the end of a run
//!
//! ## Architecture
//!
//! No I/O lives here. The only seam to the outside world is the
//! [`traits::ChatProvider`] trait, implemented by `medlex-llm`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod entry;
pub mod result;
pub mod token;
pub mod traits;

// Re-exports for convenience
pub use chat::{ChatMessage, ChatRole};
pub use entry::{WordEntry, Wordlist};
pub use result::{FailedToken, RunSummary, TaskResult};
pub use token::normalize_token;
