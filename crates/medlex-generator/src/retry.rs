//! Bounded retries with exponential backoff

use crate::error::{GenerationError, RetryExhausted};
use crate::generator::{Record, WordEntryGenerator};
use medlex_domain::traits::ChatProvider;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempt limit and backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_unit: Duration,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Attempts per token, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait before attempt `attempt` (0-indexed)
    ///
    /// `None` for the first attempt, then `unit * 2^(attempt - 1)`.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return None;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        Some(self.backoff_unit.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Runs a [`WordEntryGenerator`] until it succeeds or attempts run out
pub struct RetryingTask<P>
where
    P: ChatProvider,
{
    generator: WordEntryGenerator<P>,
    policy: RetryPolicy,
}

impl<P> RetryingTask<P>
where
    P: ChatProvider,
{
    /// Wrap a generator with a retry policy
    pub fn new(generator: WordEntryGenerator<P>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// The active policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate a record, or `None` once every attempt has failed
    pub async fn run_with_retry(&self, word: &str) -> Option<Record> {
        self.run(word).await.ok()
    }

    /// Generate a record, reporting the final error on exhaustion
    pub async fn run(&self, word: &str) -> Result<Record, RetryExhausted> {
        let mut last_error = GenerationError::Transport("no attempt made".to_string());

        for attempt in 0..self.policy.max_attempts {
            if let Some(delay) = self.policy.delay_before(attempt) {
                debug!("Retrying '{}' in {:?} (attempt {})", word, delay, attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match self.generator.generate(word).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    warn!(
                        "Attempt {}/{} for '{}' failed: {}",
                        attempt + 1,
                        self.policy.max_attempts,
                        word,
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(RetryExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }
}
