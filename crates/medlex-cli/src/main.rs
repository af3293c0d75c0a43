//! Medlex CLI - generate a medical vocabulary wordlist.

use clap::Parser;
use medlex_cli::Cli;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Before parsing, so OPENAI_API_KEY from .env reaches the --api-key fallback
    let env_file = medlex_cli::config::load_env_file(None);
    let cli = Cli::parse();

    // Log to stderr so progress lines on stdout stay clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    if let Err(e) = medlex_cli::run::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
