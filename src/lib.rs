//! storefill - Draft Chrome Web Store listings from a GitHub repository
//!
//! Reads a browser extension's manifest, README, package.json, privacy policy
//! and license through the GitHub API, then asks a chat-completion service to
//! fill the Store Listing, Privacy Practices and Distribution tabs.

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod util;
