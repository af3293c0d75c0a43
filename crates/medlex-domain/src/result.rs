//! Per-token outcomes and run accounting

use crate::entry::WordEntry;
use serde::{Deserialize, Serialize};

/// Outcome of processing one normalized token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// The model produced a usable entry
    Success(WordEntry),

    /// Every attempt failed, or the worker itself failed
    Failure {
        /// Normalized token that failed
        token: String,
        /// Human-readable reason
        reason: String,
    },
}

impl TaskResult {
    /// Build a failure result
    pub fn failure(token: impl Into<String>, reason: impl Into<String>) -> Self {
        TaskResult::Failure {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }

    /// The entry, if successful
    pub fn entry(&self) -> Option<&WordEntry> {
        match self {
            TaskResult::Success(entry) => Some(entry),
            TaskResult::Failure { .. } => None,
        }
    }
}

/// A token that did not make it into the wordlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedToken {
    /// Normalized token
    pub token: String,
    /// Why it failed
    pub reason: String,
}

/// Counts for a finished run
///
/// `succeeded + failed == total` holds for every summary built by
/// [`RunSummary::from_results`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of distinct tokens dispatched
    pub total: usize,
    /// Tokens that produced an entry
    pub succeeded: usize,
    /// Tokens that exhausted their attempts
    pub failed: usize,
    /// Failed tokens in input order
    pub failures: Vec<FailedToken>,
}

impl RunSummary {
    /// Tally a result sequence
    pub fn from_results(results: &[TaskResult]) -> Self {
        let failures: Vec<FailedToken> = results
            .iter()
            .filter_map(|result| match result {
                TaskResult::Failure { token, reason } => Some(FailedToken {
                    token: token.clone(),
                    reason: reason.clone(),
                }),
                TaskResult::Success(_) => None,
            })
            .collect();

        Self {
            total: results.len(),
            succeeded: results.len() - failures.len(),
            failed: failures.len(),
            failures,
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} tokens: {} succeeded, {} failed",
            self.total, self.succeeded, self.failed
        )
    }
}
