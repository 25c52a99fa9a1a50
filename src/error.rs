//! Error kinds shared across the pipeline.
//!
//! Internal code matches on [`ListingError`] variants. The "Error"-prefixed
//! strings users see are produced only at the outer boundary through
//! [`ListingError::report`] and [`agent_output`].

use thiserror::Error;

/// Leading marker of every user-facing failure string.
pub const ERROR_MARKER: &str = "Error";

#[derive(Debug, Error)]
pub enum ListingError {
    /// The input is not a recognizable GitHub repository URL.
    #[error("Invalid GitHub repository URL: {0}")]
    InvalidReference(String),

    /// Repository metadata could not be retrieved.
    #[error("repository {0} could not be found: {1}")]
    RepositoryNotFound(String, String),

    /// manifest.json is absent, unreadable or not a JSON object.
    #[error("manifest.json not found or invalid: {0}")]
    MissingManifest(String),

    /// The completion service answered with zero candidates.
    #[error("No response choices returned from agent.")]
    NoChoices,

    /// Transport, authentication or service-side failure of a completion call.
    #[error("{0}")]
    ServiceFailure(String),
}

impl ListingError {
    /// Render an analysis failure as the user-facing error string.
    pub fn report(&self) -> String {
        match self {
            Self::MissingManifest(_) => {
                format!("{}: manifest.json not found or invalid", ERROR_MARKER)
            }
            other => format!("{} analyzing repository: {}", ERROR_MARKER, other),
        }
    }
}

/// Collapse an agent result into the text shown to the user.
pub fn agent_output(result: Result<String, ListingError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => format!("{}: {}", ERROR_MARKER, e),
    }
}

/// Why a single file lookup against the hosting API came back empty-handed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("could not decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("request for {path} failed: {reason}")]
    Transport { path: String, reason: String },
}

impl FetchError {
    /// Absence and undecodable content are routine; anything else is worth a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Decode { .. })
    }
}
