//! End-to-end run: normalize, dispatch, assemble

use crate::assembler::{normalize_tokens, WordlistAssembler};
use crate::config::GeneratorConfig;
use crate::dispatcher::{ConcurrentDispatcher, ProgressEvent, ProgressObserver};
use crate::error::GeneratorError;
use crate::generator::WordEntryGenerator;
use crate::retry::{RetryPolicy, RetryingTask};
use medlex_domain::traits::ChatProvider;
use medlex_domain::{RunSummary, Wordlist};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Per-run metadata that is not part of the generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Lesson stamped on every entry
    pub lesson: u32,
    /// Version string of the output wordlist
    pub version: String,
    /// Category override for every entry
    pub category: Option<String>,
    /// Process only the first N normalized tokens
    pub limit: Option<usize>,
}

impl RunOptions {
    /// Options for a lesson and version, no category override or limit
    pub fn new(lesson: u32, version: impl Into<String>) -> Self {
        Self {
            lesson,
            version: version.into(),
            category: None,
            limit: None,
        }
    }
}

/// Result of a whole run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The wordlist to write
    pub wordlist: Wordlist,
    /// Counts and failed tokens
    pub summary: RunSummary,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

/// Wires the generator, retry layer, dispatcher, and assembler together
pub struct WordlistPipeline<P>
where
    P: ChatProvider + 'static,
{
    dispatcher: ConcurrentDispatcher<P>,
    assembler: WordlistAssembler,
    limit: Option<usize>,
}

impl<P> WordlistPipeline<P>
where
    P: ChatProvider + 'static,
{
    /// Build a pipeline after validating the configuration
    pub fn new(
        provider: Arc<P>,
        config: &GeneratorConfig,
        options: RunOptions,
    ) -> Result<Self, GeneratorError> {
        config.validate().map_err(GeneratorError::Config)?;

        let generator = WordEntryGenerator::new(provider, config.schema_variant);
        let policy = RetryPolicy::new(config.max_attempts, config.backoff_unit());
        let dispatcher =
            ConcurrentDispatcher::new(RetryingTask::new(generator, policy), config.concurrency);

        let mut assembler = WordlistAssembler::new(options.lesson, options.version);
        if let Some(category) = options.category {
            assembler = assembler.with_category(category);
        }

        Ok(Self {
            dispatcher,
            assembler,
            limit: options.limit,
        })
    }

    /// Run without progress reporting
    pub async fn run<S: AsRef<str>>(&self, raw_tokens: &[S]) -> RunOutcome {
        self.run_with_progress(raw_tokens, &|_: &ProgressEvent| {}).await
    }

    /// Run, reporting each finished token to `observer`
    pub async fn run_with_progress<S: AsRef<str>>(
        &self,
        raw_tokens: &[S],
        observer: &dyn ProgressObserver,
    ) -> RunOutcome {
        let started = Instant::now();

        let mut tokens = normalize_tokens(raw_tokens);
        info!(
            "{} raw tokens normalized to {} distinct",
            raw_tokens.len(),
            tokens.len()
        );
        if let Some(limit) = self.limit {
            tokens.truncate(limit);
        }

        let results = self.dispatcher.run_with_progress(&tokens, observer).await;
        let (wordlist, summary) = self.assembler.assemble(&results);

        info!("Run finished: {}", summary.summary());

        RunOutcome {
            wordlist,
            summary,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}
