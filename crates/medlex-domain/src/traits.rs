//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::chat::ChatMessage;
use async_trait::async_trait;

/// Trait for chat completion providers
///
/// Implemented by the infrastructure layer (medlex-llm). Implementations are
/// shared across concurrent workers, so they must be `Send + Sync`.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send one conversation and return the reply text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
