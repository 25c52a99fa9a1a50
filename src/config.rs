use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::util::{non_blank, SecretString};

pub const ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";
pub const KEY_ENV: &str = "AZURE_OPENAI_KEY";
pub const MODEL_ENV: &str = "AZURE_OPENAI_MODEL";
pub const API_VERSION_ENV: &str = "AZURE_OPENAI_API_VERSION";

/// Upper bound on generated tokens per agent call.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Non-secret settings, optionally read from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout. When unset the HTTP client's own default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding an optional access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
        }
    }
}

impl GitHubConfig {
    /// Token passed straight through to the API; anonymous access otherwise.
    pub fn token(&self) -> Option<SecretString> {
        env::var(&self.token_env)
            .ok()
            .and_then(|v| non_blank(&v).map(|s| SecretString::new(s.to_string())))
    }
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl Settings {
    /// Load settings from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            debug!("Loading settings from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        if let Ok(settings) = Self::load_from_path("storefill.toml") {
            debug!("Loaded settings from ./storefill.toml");
            return Ok(settings);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("storefill").join("config.toml");
            if let Ok(settings) = Self::load_from_path(&config_path) {
                debug!("Loaded settings from {:?}", config_path);
                return Ok(settings);
            }
        }

        debug!("Using default settings");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }
}

/// Variable source backed by the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Everything needed to talk to the completion service.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: SecretString,
    pub model: String,
    pub api_version: String,
    pub max_tokens: u32,
    pub timeout_secs: Option<u64>,
}

impl CompletionConfig {
    /// Build from an arbitrary variable source. Every variable must be present and non-blank.
    pub fn from_lookup<F>(settings: &CompletionSettings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .as_deref()
                .and_then(non_blank)
                .map(str::to_string)
                .ok_or_else(|| anyhow!("{} is not set.", name))
        };

        Ok(Self {
            endpoint: required(ENDPOINT_ENV)?.trim_end_matches('/').to_string(),
            api_key: SecretString::new(required(KEY_ENV)?),
            model: required(MODEL_ENV)?,
            api_version: required(API_VERSION_ENV)?,
            max_tokens: settings.max_tokens,
            timeout_secs: settings.timeout_secs,
        })
    }
}
