use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use tracing::info;

use crate::config::{self, CompletionConfig, Settings};
use crate::github::{GitHubClient, RepositoryHost};
use crate::llm::client::{LlmClient, MockLlmClient};
use crate::llm::client_impl::AzureOpenAIClient;
use crate::pipeline::flow::{self, Drafter};

const URL_PROMPT: &str = "Enter the GitHub repository URL of your Chrome Extension: ";

#[derive(Debug, Default)]
pub struct DraftOptions {
    pub repo_url: Option<String>,
    pub config: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub context_only: bool,
    pub dry_run: bool,
}

/// Returns `false` when the repository could not be analyzed.
pub async fn run(options: DraftOptions) -> Result<bool> {
    let settings = load_settings(&options)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with(
        options,
        &settings,
        config::env_lookup,
        &mut stdin.lock(),
        &mut stdout,
    )
    .await
}

/// Body of [`run`] with the variable source and terminal streams supplied by the caller.
pub async fn run_with<F, R, W>(
    options: DraftOptions,
    settings: &Settings,
    lookup: F,
    input: &mut R,
    out: &mut W,
) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
    R: BufRead,
    W: Write,
{
    // Credentials are checked before asking for input
    let client = if options.context_only {
        None
    } else {
        Some(create_client(settings, &options, lookup)?)
    };

    let repo_url = read_repo_url(options.repo_url, input, out)?;
    info!("Repository URL: {}", repo_url);

    let host: Box<dyn RepositoryHost> = Box::new(GitHubClient::new(&settings.github)?);

    match client {
        None => flow::print_context(host.as_ref(), &repo_url, out).await,
        Some(client) => Drafter::new(host, client).run(&repo_url, out).await,
    }
}

/// Settings from file, with command-line overrides applied.
pub fn load_settings(options: &DraftOptions) -> Result<Settings> {
    let mut settings = Settings::load_with_path(options.config.clone())?;
    if let Some(max_tokens) = options.max_tokens {
        info!("CLI override: max_tokens = {}", max_tokens);
        settings.completion.max_tokens = max_tokens;
    }
    Ok(settings)
}

/// Completion settings from the variable source, with the model override applied.
pub fn completion_config<F>(
    settings: &Settings,
    options: &DraftOptions,
    lookup: F,
) -> Result<CompletionConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut completion = CompletionConfig::from_lookup(&settings.completion, lookup)?;
    if let Some(ref model) = options.model {
        info!("CLI override: model = {}", model);
        completion.model = model.clone();
    }
    Ok(completion)
}

fn create_client<F>(
    settings: &Settings,
    options: &DraftOptions,
    lookup: F,
) -> Result<Box<dyn LlmClient>>
where
    F: Fn(&str) -> Option<String>,
{
    if options.dry_run {
        info!("Dry run: using mock completion client");
        return Ok(Box::new(MockLlmClient::new()));
    }

    let completion = completion_config(settings, options, lookup)?;
    info!(
        "Completion endpoint: {} (model {}, api-version {})",
        completion.endpoint, completion.model, completion.api_version
    );

    Ok(Box::new(AzureOpenAIClient::new(&completion)?))
}

/// Use the URL given on the command line, or prompt for one.
pub fn read_repo_url<R: BufRead, W: Write>(
    given: Option<String>,
    input: &mut R,
    prompt_out: &mut W,
) -> Result<String> {
    let raw = match given {
        Some(url) => url,
        None => {
            write!(prompt_out, "{}", URL_PROMPT)?;
            prompt_out.flush()?;
            let mut line = String::new();
            input
                .read_line(&mut line)
                .context("failed to read repository URL")?;
            line
        }
    };

    let url = raw.trim();
    if url.is_empty() {
        bail!("Repository URL must not be empty.");
    }
    Ok(url.to_string())
}
