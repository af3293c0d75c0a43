//! Fixed-width worker pool over all tokens

use crate::generator::{entry_from_record, Record};
use crate::retry::RetryingTask;
use medlex_domain::traits::ChatProvider;
use medlex_domain::TaskResult;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Default number of concurrent workers
pub const DEFAULT_CONCURRENCY: usize = 5;

/// One token finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Position of the token in the dispatched list
    pub index: usize,
    /// The token
    pub token: String,
    /// Whether it produced an entry
    pub success: bool,
    /// Tokens finished so far, this one included
    pub completed: usize,
    /// Successes so far
    pub succeeded: usize,
    /// Failures so far
    pub failed: usize,
    /// Tokens dispatched in total
    pub total: usize,
}

/// Receives an event each time a token finishes, in completion order
pub trait ProgressObserver: Send + Sync {
    /// Called once per token
    fn on_progress(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Runs a [`RetryingTask`] for every token on a bounded pool
///
/// Completion order is arbitrary; the returned results always line up with
/// the input tokens. No token is dropped: a worker that panics is reported
/// as a failure for its own token and its siblings keep running.
pub struct ConcurrentDispatcher<P>
where
    P: ChatProvider + 'static,
{
    task: Arc<RetryingTask<P>>,
    concurrency: usize,
}

impl<P> ConcurrentDispatcher<P>
where
    P: ChatProvider + 'static,
{
    /// Create a dispatcher; `concurrency` is clamped to at least one
    pub fn new(task: RetryingTask<P>, concurrency: usize) -> Self {
        Self {
            task: Arc::new(task),
            concurrency: concurrency.max(1),
        }
    }

    /// Pool width
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every token, without progress reporting
    pub async fn run(&self, tokens: &[String]) -> Vec<TaskResult> {
        self.run_with_progress(tokens, &|_: &ProgressEvent| {}).await
    }

    /// Process every token, reporting each completion to `observer`
    pub async fn run_with_progress(
        &self,
        tokens: &[String],
        observer: &dyn ProgressObserver,
    ) -> Vec<TaskResult> {
        let total = tokens.len();
        info!("Dispatching {} tokens on {} workers", total, self.concurrency);

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();

        for (index, token) in tokens.iter().enumerate() {
            let task = Arc::clone(&self.task);
            let permits = Arc::clone(&permits);
            let token = token.clone();

            workers.spawn(async move {
                let word = token.clone();
                // Inner task isolates a panic so it can be charged to this index.
                let work = tokio::spawn(run_permitted(task, permits, word));

                let result = match work.await {
                    Ok(Ok(record)) => TaskResult::Success(entry_from_record(&record, &token)),
                    Ok(Err(reason)) => TaskResult::failure(token, reason),
                    Err(join_error) => {
                        error!("Worker for '{}' failed: {}", token, join_error);
                        TaskResult::failure(token, format!("Worker failed: {}", join_error))
                    }
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<TaskResult>> = vec![None; total];
        let (mut succeeded, mut failed) = (0, 0);

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if result.is_success() {
                        succeeded += 1;
                    } else {
                        failed += 1;
                    }
                    observer.on_progress(&ProgressEvent {
                        index,
                        token: tokens[index].clone(),
                        success: result.is_success(),
                        completed: succeeded + failed,
                        succeeded,
                        failed,
                        total,
                    });
                    slots[index] = Some(result);
                }
                Err(join_error) => error!("Dispatcher task failed: {}", join_error),
            }
        }

        info!("Dispatch complete: {} succeeded, {} failed", succeeded, failed);

        slots
            .into_iter()
            .zip(tokens)
            .map(|(slot, token)| {
                slot.unwrap_or_else(|| TaskResult::failure(token.clone(), "Worker lost"))
            })
            .collect()
    }
}

/// Run one token while holding a pool permit; no permit, no request
async fn run_permitted<P>(
    task: Arc<RetryingTask<P>>,
    permits: Arc<Semaphore>,
    word: String,
) -> Result<Record, String>
where
    P: ChatProvider + 'static,
{
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(closed) => {
            error!("No worker slot for '{}': {}", word, closed);
            return Err(format!("Worker pool closed: {}", closed));
        }
    };
    task.run(&word).await.map_err(|exhausted| exhausted.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaVariant;
    use crate::generator::WordEntryGenerator;
    use crate::retry::RetryPolicy;
    use async_trait::async_trait;
    use medlex_domain::{ChatMessage, ChatRole};
    use medlex_llm::{LlmError, MockProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn reply(word: &str) -> String {
        format!(r#"{{"output": {{"word": "{}"}}}}"#, word)
    }

    fn dispatcher<P: ChatProvider + 'static>(provider: P, width: usize) -> ConcurrentDispatcher<P> {
        let generator = WordEntryGenerator::new(Arc::new(provider), SchemaVariant::Basic);
        let task = RetryingTask::new(generator, RetryPolicy::new(3, Duration::from_millis(10)));
        ConcurrentDispatcher::new(task, width)
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn user_word(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    /// Tracks how many calls are in flight at once
    struct GaugeProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ChatProvider for GaugeProvider {
        type Error = LlmError;

        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(reply(&user_word(messages)))
        }

        fn model(&self) -> &str {
            "gauge"
        }
    }

    /// Panics on one word
    struct PanickingProvider;

    #[async_trait]
    impl ChatProvider for PanickingProvider {
        type Error = LlmError;

        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
            let word = user_word(messages);
            if word == "boom" {
                panic!("provider exploded");
            }
            Ok(reply(&word))
        }

        fn model(&self) -> &str {
            "panicky"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_preserves_input_order_despite_completion_order() {
        let words = ["alpha", "beta", "gamma", "delta"];
        let mut provider = MockProvider::default();
        for (i, w) in words.iter().enumerate() {
            provider.add_response(*w, reply(w));
            // earlier tokens finish later
            provider.add_delay(*w, Duration::from_millis(100 * (words.len() - i) as u64));
        }

        let completion = Mutex::new(Vec::new());
        let observer = |event: &ProgressEvent| {
            completion.lock().unwrap().push(event.token.to_string());
        };

        let results = dispatcher(provider, 4)
            .run_with_progress(&tokens(&words), &observer)
            .await;

        let order: Vec<_> = results.iter().map(|r| r.entry().unwrap().word.clone()).collect();
        assert_eq!(order, tokens(&words));
        assert_eq!(*completion.lock().unwrap(), tokens(&["delta", "gamma", "beta", "alpha"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_width_caps_in_flight_requests() {
        let provider = Arc::new(GaugeProvider {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let generator = WordEntryGenerator::new(Arc::clone(&provider), SchemaVariant::Basic);
        let dispatcher = ConcurrentDispatcher::new(
            RetryingTask::new(generator, RetryPolicy::default()),
            3,
        );
        let words: Vec<String> = (0..12).map(|i| format!("term{}", i)).collect();

        let results = dispatcher.run(&words).await;

        assert_eq!(results.len(), 12);
        assert!(results.iter().all(TaskResult::is_success));
        assert_eq!(provider.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_does_not_abort_siblings() {
        let mut provider = MockProvider::default();
        provider.add_response("otitis", reply("otitis"));
        provider.add_response("nephritis", reply("nephritis"));
        provider.add_error("xyz");

        let results = dispatcher(provider.clone(), 2)
            .run(&tokens(&["otitis", "xyz", "nephritis"]))
            .await;

        assert!(results[0].is_success());
        assert!(matches!(&results[1], TaskResult::Failure { token, .. } if token == "xyz"));
        assert!(results[2].is_success());
        assert_eq!(provider.calls_for("xyz"), 3);
    }

    #[tokio::test]
    async fn test_panicking_worker_becomes_failure() {
        let results = dispatcher(PanickingProvider, 2)
            .run(&tokens(&["otitis", "boom", "nephritis"]))
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        match &results[1] {
            TaskResult::Failure { token, reason } => {
                assert_eq!(token, "boom");
                assert!(reason.starts_with("Worker failed"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
        assert!(results[2].is_success());
    }

    #[tokio::test]
    async fn test_progress_counts_reconcile() {
        let mut provider = MockProvider::default();
        provider.add_response("a", reply("a"));
        provider.add_error("b");
        let last = Mutex::new(None);
        let observer = |event: &ProgressEvent| {
            *last.lock().unwrap() = Some((event.completed, event.succeeded, event.failed, event.total));
        };

        let dispatcher = ConcurrentDispatcher::new(
            RetryingTask::new(
                WordEntryGenerator::new(Arc::new(provider), SchemaVariant::Basic),
                RetryPolicy::new(1, Duration::ZERO),
            ),
            DEFAULT_CONCURRENCY,
        );
        dispatcher.run_with_progress(&tokens(&["a", "b"]), &observer).await;

        assert_eq!(*last.lock().unwrap(), Some((2, 1, 1, 2)));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results = dispatcher(MockProvider::default(), 5).run(&[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_fails_token_without_request() {
        let provider = MockProvider::new(reply("otitis"));
        let generator = WordEntryGenerator::new(Arc::new(provider.clone()), SchemaVariant::Basic);
        let task = Arc::new(RetryingTask::new(generator, RetryPolicy::default()));
        let permits = Arc::new(Semaphore::new(1));
        permits.close();

        let result = run_permitted(task, permits, "otitis".to_string()).await;

        assert!(result.unwrap_err().starts_with("Worker pool closed"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_permitted_run_reports_exhaustion() {
        let mut provider = MockProvider::default();
        provider.add_error("xyz");
        let generator = WordEntryGenerator::new(Arc::new(provider.clone()), SchemaVariant::Basic);
        let task = Arc::new(RetryingTask::new(generator, RetryPolicy::new(1, Duration::ZERO)));

        let result = run_permitted(task, Arc::new(Semaphore::new(1)), "xyz".to_string()).await;

        assert!(result.unwrap_err().starts_with("Exhausted 1 attempts"));
        assert_eq!(provider.calls_for("xyz"), 1);
    }

    #[test]
    fn test_zero_width_clamped() {
        assert_eq!(dispatcher(MockProvider::default(), 0).concurrency(), 1);
    }
}
