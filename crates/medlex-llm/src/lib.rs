//! Medlex LLM Provider Layer
//!
//! Implementations of the `ChatProvider` trait from `medlex-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use medlex_domain::{traits::ChatProvider, ChatMessage};
//! use medlex_llm::MockProvider;
//!
//! # async fn demo() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let reply = provider.complete(&[ChatMessage::user("carcinoma")]).await.unwrap();
//! assert_eq!(reply, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use medlex_domain::traits::ChatProvider;
use medlex_domain::{ChatMessage, ChatRole};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The API answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Credential rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Reply did not have the expected envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, String>,
    errors: HashSet<String>,
    scripts: HashMap<String, VecDeque<MockReply>>,
    delays: HashMap<String, Duration>,
    calls: HashMap<String, usize>,
    total_calls: usize,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are keyed by the content of the last user message, which for the
/// word generator is the token being looked up. Lookup order is: scripted
/// sequence (consumed one reply per call), permanent error, fixed per-word
/// response, then the default response.
///
/// # Examples
///
/// ```
/// use medlex_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("carcinoma", r#"{"output": {"word": "carcinoma"}}"#);
/// provider.add_error("otitis");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Add a fixed response for a given word
    pub fn add_response(&mut self, word: impl Into<String>, response: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(word.into(), response.into());
    }

    /// Configure every call for a given word to fail
    pub fn add_error(&mut self, word: impl Into<String>) {
        self.state.lock().unwrap().errors.insert(word.into());
    }

    /// Script successive replies for a word; `Err(())` simulates a transport failure
    ///
    /// Once the script is used up, later calls fall back to the fixed
    /// response or the default.
    pub fn add_script(&mut self, word: impl Into<String>, replies: Vec<Result<&str, ()>>) {
        let script = replies
            .into_iter()
            .map(|reply| match reply {
                Ok(text) => MockReply::Text(text.to_string()),
                Err(()) => MockReply::Error,
            })
            .collect();
        self.state.lock().unwrap().scripts.insert(word.into(), script);
    }

    /// Delay replies for a word
    pub fn add_delay(&mut self, word: impl Into<String>, delay: Duration) {
        self.state.lock().unwrap().delays.insert(word.into(), delay);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().total_calls
    }

    /// Get the number of calls made for one word
    pub fn calls_for(&self, word: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(word)
            .copied()
            .unwrap_or(0)
    }

    /// Reset the call counters
    pub fn reset_call_count(&self) {
        let mut state = self.state.lock().unwrap();
        state.total_calls = 0;
        state.calls.clear();
    }

    fn next_reply(&self, word: &str) -> (MockReply, Option<Duration>) {
        let mut state = self.state.lock().unwrap();
        state.total_calls += 1;
        *state.calls.entry(word.to_string()).or_insert(0) += 1;

        let delay = state.delays.get(word).copied();
        let scripted = state.scripts.get_mut(word).and_then(|script| script.pop_front());
        let reply = match scripted {
            Some(reply) => reply,
            None if state.errors.contains(word) => MockReply::Error,
            None => MockReply::Text(
                state
                    .responses
                    .get(word)
                    .cloned()
                    .unwrap_or_else(|| self.default_response.clone()),
            ),
        };
        (reply, delay)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        let word = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let (reply, delay) = self.next_reply(word);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Communication("Mock error".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(word: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("task"),
            ChatMessage::assistant("schema"),
            ChatMessage::user(word),
        ]
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&ask("anything")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&ask("hello")).await.unwrap(), "world");
        assert_eq!(provider.complete(&ask("foo")).await.unwrap(), "bar");
        assert_eq!(
            provider.complete(&ask("unknown")).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&ask("a")).await.unwrap();
        provider.complete(&ask("a")).await.unwrap();
        provider.complete(&ask("b")).await.unwrap();
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.calls_for("a"), 2);
        assert_eq!(provider.calls_for("b"), 1);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
        assert_eq!(provider.calls_for("a"), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad");

        let result = provider.complete(&ask("bad")).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_script_then_fallback() {
        let mut provider = MockProvider::new("fallback");
        provider.add_script("w", vec![Err(()), Ok("second")]);

        assert!(provider.complete(&ask("w")).await.is_err());
        assert_eq!(provider.complete(&ask("w")).await.unwrap(), "second");
        assert_eq!(provider.complete(&ask("w")).await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&ask("x")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
