use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::ListingError;

// Accepts https://github.com/owner/repo as well as git@github.com:owner/repo.git.
// Segments stop at a query or fragment, as in browser-copied URLs.
static REPO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com[/:]([^/?#]+)/([^/?#]+)").expect("valid repository regex")
});

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl RepositoryReference {
    /// Extract owner and repository name from a GitHub URL.
    ///
    /// A trailing `.git` is removed from the name. Nothing is checked beyond
    /// the shape of the URL.
    pub fn parse(url: &str) -> Result<Self, ListingError> {
        let caps = REPO_URL_RE
            .captures(url)
            .ok_or_else(|| ListingError::InvalidReference(url.to_string()))?;

        let owner = caps[1].to_string();
        let raw_name = &caps[2];
        let name = raw_name.strip_suffix(".git").unwrap_or(raw_name).to_string();

        if owner.is_empty() || name.is_empty() {
            return Err(ListingError::InvalidReference(url.to_string()));
        }

        Ok(Self { owner, name })
    }

    /// `owner/name`, as used in API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
