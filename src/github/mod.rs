//! GitHub access: repository URL parsing and the REST contents/metadata API.

pub mod client;
pub mod url;

pub use client::{GitHubClient, RepositoryHost, RepositoryStats};
pub use url::RepositoryReference;
