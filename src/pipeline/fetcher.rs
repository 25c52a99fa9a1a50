use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::ListingError;
use crate::github::{RepositoryHost, RepositoryReference, RepositoryStats};

pub const MANIFEST_PATH: &str = "manifest.json";
pub const README_PATH: &str = "README.md";
pub const PACKAGE_PATH: &str = "package.json";

/// Tried in order; the first non-empty file wins.
pub const PRIVACY_POLICY_CANDIDATES: &[&str] = &[
    "PRIVACY.md",
    "PRIVACY_POLICY.md",
    "privacy.md",
    "privacy-policy.md",
];

/// Tried in order; the first non-empty file wins.
pub const LICENSE_CANDIDATES: &[&str] = &["LICENSE", "LICENSE.md", "license.txt"];

/// Raw material pulled from the repository, before assembly.
#[derive(Debug, Clone)]
pub struct FetchedRepository {
    pub manifest: Map<String, Value>,
    pub readme: Option<String>,
    pub package_json: Option<String>,
    pub privacy_policy: Option<String>,
    pub license: Option<String>,
    pub stats: RepositoryStats,
}

pub struct Fetcher<'a> {
    host: &'a dyn RepositoryHost,
}

impl<'a> Fetcher<'a> {
    pub fn new(host: &'a dyn RepositoryHost) -> Self {
        Self { host }
    }

    /// Pull statistics, the manifest and the optional documents.
    ///
    /// Only a missing repository or an unusable manifest is an error; every
    /// other file degrades to `None`.
    pub async fn fetch(&self, repo: &RepositoryReference) -> Result<FetchedRepository, ListingError> {
        info!("Fetching repository {}", repo);

        let stats = self
            .host
            .repository_stats(repo)
            .await
            .map_err(|e| ListingError::RepositoryNotFound(repo.full_name(), format!("{:#}", e)))?;

        let manifest = self.manifest(repo).await?;

        let readme = self.optional(repo, README_PATH).await;
        let package_json = self.optional(repo, PACKAGE_PATH).await;
        let privacy_policy = self.first_found(repo, PRIVACY_POLICY_CANDIDATES).await;
        let license = self.first_found(repo, LICENSE_CANDIDATES).await;

        Ok(FetchedRepository {
            manifest,
            readme,
            package_json,
            privacy_policy,
            license,
            stats,
        })
    }

    async fn manifest(&self, repo: &RepositoryReference) -> Result<Map<String, Value>, ListingError> {
        let raw = self
            .host
            .file_contents(repo, MANIFEST_PATH)
            .await
            .map_err(|e| ListingError::MissingManifest(e.to_string()))?;

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ListingError::MissingManifest(
                "manifest.json is not a JSON object".to_string(),
            )),
            Err(e) => Err(ListingError::MissingManifest(e.to_string())),
        }
    }

    async fn optional(&self, repo: &RepositoryReference, path: &str) -> Option<String> {
        match self.host.file_contents(repo, path).await {
            Ok(content) => {
                debug!("Found {} ({} bytes)", path, content.len());
                Some(content)
            }
            Err(e) if e.is_expected() => {
                debug!("Skipping {}: {}", path, e);
                None
            }
            Err(e) => {
                warn!("Treating {} as absent: {}", path, e);
                None
            }
        }
    }

    async fn first_found(&self, repo: &RepositoryReference, candidates: &[&str]) -> Option<String> {
        for path in candidates {
            if let Some(content) = self.optional(repo, path).await {
                if !content.is_empty() {
                    return Some(content);
                }
            }
        }
        None
    }
}
