use anyhow::Result;
use std::io::Write;
use tracing::{error, info};

use super::agent::ListingAgent;
use super::context::ExtensionContext;
use super::fetcher::Fetcher;
use crate::error::{agent_output, ListingError};
use crate::github::{RepositoryHost, RepositoryReference};
use crate::llm::client::LlmClient;
use crate::llm::prompts::ListingSection;

/// Repository analysis followed by the three listing agents.
pub struct Drafter {
    host: Box<dyn RepositoryHost>,
    client: Box<dyn LlmClient>,
}

impl Drafter {
    pub fn new(host: Box<dyn RepositoryHost>, client: Box<dyn LlmClient>) -> Self {
        Self { host, client }
    }

    /// Run every agent against an already assembled context.
    pub async fn run_flow<W: Write>(&self, context: &ExtensionContext, out: &mut W) -> Result<()> {
        let context_json = context.to_json()?;
        run_agents(self.client.as_ref(), &context_json, out).await
    }

    /// Analyze, then draft. Returns `false` when analysis failed and no agent ran.
    pub async fn run<W: Write>(&self, repo_url: &str, out: &mut W) -> Result<bool> {
        writeln!(out, "\nAnalyzing repository...")?;

        let Some(context) = analyze_or_report(self.host.as_ref(), repo_url, out).await? else {
            return Ok(false);
        };

        writeln!(out, "\nRepository analysis complete. Running agent flow...")?;
        self.run_flow(&context, out).await?;
        Ok(true)
    }
}

/// Parse the URL, fetch the repository and assemble the agent context.
pub async fn analyze(
    host: &dyn RepositoryHost,
    repo_url: &str,
) -> Result<ExtensionContext, ListingError> {
    let repo = RepositoryReference::parse(repo_url)?;
    let fetched = Fetcher::new(host).fetch(&repo).await?;
    let context = ExtensionContext::from_fetched(repo_url, &fetched);
    info!("Assembled context for {}", repo);
    Ok(context)
}

/// Analyze, writing the failure line to `out` instead of returning the error.
async fn analyze_or_report<W: Write>(
    host: &dyn RepositoryHost,
    repo_url: &str,
    out: &mut W,
) -> Result<Option<ExtensionContext>> {
    match analyze(host, repo_url).await {
        Ok(context) => Ok(Some(context)),
        Err(e) => {
            error!("Error analyzing GitHub repository: {}", e);
            writeln!(out, "Failed to analyze repository: {}", e.report())?;
            Ok(None)
        }
    }
}

/// Analyze and print the context JSON without running any agent.
pub async fn print_context<W: Write>(
    host: &dyn RepositoryHost,
    repo_url: &str,
    out: &mut W,
) -> Result<bool> {
    let Some(context) = analyze_or_report(host, repo_url, out).await? else {
        return Ok(false);
    };
    writeln!(out, "{}", context.to_json()?)?;
    Ok(true)
}

/// Run the agents one after another, printing each result before the next call.
///
/// A failing agent prints its error text in place of a draft; the rest still run.
pub async fn run_agents<W: Write>(
    client: &dyn LlmClient,
    context_json: &str,
    out: &mut W,
) -> Result<()> {
    for section in ListingSection::ALL {
        let output = agent_output(ListingAgent::new(client, section).run(context_json).await);
        writeln!(out, "\n{}\n", section.heading())?;
        writeln!(out, "{}", output)?;
        out.flush()?;
    }
    Ok(())
}
