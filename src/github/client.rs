use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::url::RepositoryReference;
use crate::config::GitHubConfig;
use crate::error::FetchError;
use crate::util::SecretString;

/// Repository-level numbers that go into the listing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryStats {
    pub stars: u64,
    pub open_issues: u64,
    /// ISO 8601 timestamp of the last update.
    pub last_updated: String,
}

/// Read-only view of a code hosting service.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Fetch repository metadata. Fails when the repository cannot be located.
    async fn repository_stats(&self, repo: &RepositoryReference) -> Result<RepositoryStats>;

    /// Fetch one file from the default branch, decoded to text.
    async fn file_contents(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, FetchError>;
}

pub struct GitHubClient {
    api_base: Url,
    token: Option<SecretString>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    stargazers_count: u64,
    open_issues_count: u64,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Self::with_base_url(config.api_base.clone(), config.token())
    }

    pub fn with_base_url(api_base: String, token: Option<SecretString>) -> Result<Self> {
        let api_base = Url::parse(&api_base)
            .with_context(|| format!("invalid GitHub API base URL {}", api_base))?;
        if api_base.cannot_be_a_base() {
            bail!("GitHub API base URL {} cannot carry a path", api_base);
        }

        Ok(Self {
            api_base,
            token,
            client: Client::builder()
                .user_agent(concat!("storefill/", env!("CARGO_PKG_VERSION")))
                .build()
                .context("failed to build HTTP client")?,
        })
    }

    /// `{api_base}/repos/{owner}/{name}/{rest..}`, each segment percent-encoded.
    fn repo_endpoint(&self, repo: &RepositoryReference, rest: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
                .extend(rest);
        }
        url
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let req = self
            .client
            .get(url)
            .header("accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => req.header("authorization", format!("Bearer {}", token.expose())),
            None => req,
        }
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn repository_stats(&self, repo: &RepositoryReference) -> Result<RepositoryStats> {
        let url = self.repo_endpoint(repo, &[]);
        debug!("Fetching repository metadata from {}", url);

        let response = self
            .get(url)
            .send()
            .await
            .context("Failed to send request to GitHub API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, error_text);
        }

        let body: RepoResponse = response
            .json()
            .await
            .context("Failed to parse GitHub repository response")?;

        Ok(RepositoryStats {
            stars: body.stargazers_count,
            open_issues: body.open_issues_count,
            last_updated: body.updated_at,
        })
    }

    async fn file_contents(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, FetchError> {
        let mut rest = vec!["contents"];
        rest.extend(path.split('/'));
        let url = self.repo_endpoint(repo, &rest);
        debug!("Fetching {}", url);

        let transport = |reason: String| FetchError::Transport {
            path: path.to_string(),
            reason,
        };

        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(transport(format!("HTTP {}", status)));
        }

        // Directories come back as a JSON array and fail here
        let body: ContentsResponse = response.json().await.map_err(|e| FetchError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        decode_content(
            path,
            body.content.as_deref().unwrap_or_default(),
            body.encoding.as_deref(),
        )
    }
}

/// Turn a contents-API payload into text.
pub fn decode_content(
    path: &str,
    content: &str,
    encoding: Option<&str>,
) -> Result<String, FetchError> {
    let decode_err = |reason: String| FetchError::Decode {
        path: path.to_string(),
        reason,
    };

    match encoding {
        Some("base64") => {
            // GitHub wraps the payload at 60 columns
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = STANDARD
                .decode(compact)
                .map_err(|e| decode_err(e.to_string()))?;
            String::from_utf8(bytes).map_err(|e| decode_err(e.to_string()))
        }
        Some("utf-8") | Some("utf8") => Ok(content.to_string()),
        other => Err(decode_err(format!(
            "unsupported encoding {:?}",
            other.unwrap_or("none")
        ))),
    }
}
