//! The `medlex` run: read, generate, write, report.

use crate::config::ResolvedRun;
use crate::error::Result;
use crate::input::read_tokens;
use crate::output::{write_failures, write_wordlist, Formatter};
use crate::Cli;
use medlex_domain::traits::ChatProvider;
use medlex_generator::{ProgressEvent, RunOutcome, WordlistPipeline};
use medlex_llm::OpenAiProvider;
use std::sync::Arc;
use tracing::info;

/// Execute a full run against the configured OpenAI-compatible API.
pub async fn execute(cli: Cli) -> Result<RunOutcome> {
    let run = ResolvedRun::from_cli(&cli)?;

    let mut provider = OpenAiProvider::with_timeout(
        run.api_key.clone(),
        run.generator.model.clone(),
        run.generator.request_timeout(),
    )?
    .with_api_base(run.generator.api_base.clone());
    if let Some(temperature) = run.generator.temperature {
        provider = provider.with_temperature(temperature);
    }

    execute_with_provider(&cli, &run, Arc::new(provider)).await
}

/// Execute a run with any provider; all fatal checks happen before dispatch.
pub async fn execute_with_provider<P>(
    cli: &Cli,
    run: &ResolvedRun,
    provider: Arc<P>,
) -> Result<RunOutcome>
where
    P: ChatProvider + 'static,
{
    let raw_tokens = read_tokens(&cli.input)?;
    info!(
        "Read {} raw terms from {} (model: {})",
        raw_tokens.len(),
        cli.input.display(),
        provider.model()
    );

    let pipeline = WordlistPipeline::new(provider, &run.generator, run.options.clone())?;

    let formatter = Formatter::new(!cli.no_color);
    let report = |event: &ProgressEvent| println!("{}", formatter.progress(event));
    let outcome = pipeline.run_with_progress(&raw_tokens, &report).await;

    write_wordlist(&cli.output, &outcome.wordlist)?;
    if let Some(path) = &cli.failures {
        write_failures(path, &outcome.summary.failures)?;
    }

    println!(
        "{}",
        formatter.summary(&outcome.summary, &cli.output, outcome.elapsed_ms)
    );
    Ok(outcome)
}
