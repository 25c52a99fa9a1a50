use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod github;
mod llm;
mod pipeline;
mod util;

use cli::draft::DraftOptions;

#[derive(Parser)]
#[command(name = "storefill", version)]
#[command(about = "Draft Chrome Web Store listing fields for an extension repository", long_about = None)]
struct Cli {
    /// GitHub repository URL. Prompted for when omitted.
    repo_url: Option<String>,

    /// Path to settings file (defaults to ./storefill.toml or ~/.config/storefill/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Override the model identifier from AZURE_OPENAI_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Override the per-agent output token limit
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Print the assembled repository context and skip the agents
    #[arg(long)]
    context_only: bool,

    /// Use mock LLM client for testing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout is reserved for the drafts
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let analyzed = cli::draft::run(DraftOptions {
        repo_url: cli.repo_url,
        config: cli.config,
        model: cli.model,
        max_tokens: cli.max_tokens,
        context_only: cli.context_only,
        dry_run: cli.dry_run,
    })
    .await?;

    if !analyzed {
        std::process::exit(1);
    }
    Ok(())
}
